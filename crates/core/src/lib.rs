pub mod money;
pub mod naming;
pub mod receipt;

pub use money::{Currency, Money};
pub use naming::{file_name, folder_path, slug};
pub use receipt::{Receipt, ReceiptError};
