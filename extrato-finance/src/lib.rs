//! extrato-finance: transaction ledger, merchant-category memory, spending reports and CSV export

pub mod category_memory;
pub mod export;
pub mod ledger;
pub mod report;

pub use category_memory::CategoryMemory;
pub use export::{to_csv_bytes, write_csv};
pub use ledger::{Ledger, StoredTransaction, TransactionFilter, UNCATEGORIZED};
pub use report::{by_category, by_merchant, merchant_overview, totals, MerchantOverview, MerchantSummary, Totals};
