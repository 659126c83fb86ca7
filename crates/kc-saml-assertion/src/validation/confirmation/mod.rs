//! Subject confirmation validators.

mod bearer;
mod data;
mod holder_of_key;
mod sender_vouches;

pub use bearer::BearerSubjectConfirmationValidator;
pub use data::ConfirmationDataValidator;
pub use holder_of_key::HolderOfKeySubjectConfirmationValidator;
pub use sender_vouches::SenderVouchesSubjectConfirmationValidator;

use crate::context::ValidationContext;
use crate::types::{Assertion, SubjectConfirmation};

/// Records that `confirmation` uses a method the validator does not service.
pub(crate) fn unsupported_method(
    context: &mut ValidationContext,
    confirmation: &SubjectConfirmation,
    assertion: &Assertion,
    serviced: &str,
) {
    context.set_failure_message(format!(
        "Subject confirmation method '{}' in assertion '{}' is not '{serviced}'",
        confirmation.method, assertion.id
    ));
}
