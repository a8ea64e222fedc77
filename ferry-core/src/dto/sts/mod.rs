//! Identity service DTOs

use crate::domain::task::AccountContext;

/// Who the signed requests are made as
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

impl CallerIdentity {
    /// Account context, if the identity carries an account ID
    pub fn into_account(self) -> Option<AccountContext> {
        self.account.map(|account_id| AccountContext {
            account_id,
            caller_arn: self.arn,
        })
    }
}
