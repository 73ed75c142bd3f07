use crate::domain::{
    account::Account,
    errors::StorageError,
    models::{AccountId, AccountStore, SharedAccount},
};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Keeps every account in memory, each behind its own lock so deliveries to
/// different accounts never contend.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<AccountId, SharedAccount>,
}

#[async_trait::async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert_account(&self, account: Account) -> Result<SharedAccount, StorageError> {
        let id = account.id();
        match self.accounts.entry(id) {
            Entry::Occupied(_) => {
                tracing::warn!("Account already exists: {}", id);
                Err(StorageError::AccountAlreadyExists(id))
            }
            Entry::Vacant(slot) => {
                let shared = Arc::new(RwLock::new(account));
                slot.insert(shared.clone());
                Ok(shared)
            }
        }
    }

    async fn get_account(&self, id: AccountId) -> Result<SharedAccount, StorageError> {
        self.accounts
            .get(&id)
            .map(|v| v.value().clone())
            .ok_or(StorageError::AccountNotFound(id))
    }

    async fn account_ids(&self) -> Result<Vec<AccountId>, StorageError> {
        let mut ids: Vec<_> = self.accounts.iter().map(|v| *v.key()).collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
