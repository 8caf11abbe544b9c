//! extrato-core: transaction model, pt-BR amount/date parsing and merchant normalization.

pub mod locale;
pub mod merchant;
pub mod text;
pub mod transaction;

pub use locale::{parse_br_date, parse_brl_amount};
pub use merchant::{normalize_merchant, NORMALIZATION_PREFIXES};
pub use text::{collapse_whitespace, fold_upper, strip_accents};
pub use transaction::{Direction, Transaction};
