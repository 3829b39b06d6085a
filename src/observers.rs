use crate::book_state::BookState;
use crate::events::LoanEvent;

/// Trait for loan transition observation
pub trait LoanObserver {
    /// Called after a book changed lend state
    fn on_loan_change(&self, book_no: u32, from: &BookState, to: &BookState, event: &LoanEvent);
}

/// Logs every loan transition through `tracing`
#[derive(Debug)]
pub struct TransitionLogger;

impl LoanObserver for TransitionLogger {
    fn on_loan_change(&self, book_no: u32, from: &BookState, to: &BookState, event: &LoanEvent) {
        tracing::info!(
            book_no,
            member_id = event.member_id(),
            "loan transition: {from:?} --({event:?})--> {to:?}"
        );
    }
}
