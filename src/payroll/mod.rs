pub mod guard;
pub mod installments;
pub mod net;

pub use guard::{DraftOutcome, DraftRequest, check_draft, prefill_entry};
pub use installments::{InstallmentDue, installments_due};
