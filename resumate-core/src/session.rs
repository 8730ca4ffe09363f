use crate::storage::{keys, ResumeStore};
use anyhow::Result;
use tracing::info;

/// Shown when nobody is logged in.
pub const ANONYMOUS_DISPLAY_NAME: &str = "User";

/// Local login stub: the stored identifier is the whole session.
/// There is no credential check.
pub struct Session<'a> {
    store: &'a dyn ResumeStore,
}

impl<'a> Session<'a> {
    pub fn new(store: &'a dyn ResumeStore) -> Self {
        Self { store }
    }

    pub fn login(&self, identifier: &str) -> Result<()> {
        self.store.set(keys::USER, identifier)?;
        info!("logged in as {identifier}");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::USER)
    }

    pub fn current_user(&self) -> Result<Option<String>> {
        Ok(self.store.get(keys::USER)?.filter(|user| !user.is_empty()))
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self.current_user()?.is_some())
    }

    pub fn display_name(&self) -> Result<String> {
        Ok(self
            .current_user()?
            .unwrap_or_else(|| ANONYMOUS_DISPLAY_NAME.to_string()))
    }
}
