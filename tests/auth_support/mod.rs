#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use repoinit::auth::{AuthError, Credential, TokenStore};

/// In-memory store that counts reads and writes.
#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<Credential>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(value: &str) -> Self {
        let store = Self::new();
        *store.token.lock().expect("store lock poisoned") = Some(credential(value));
        store
    }

    pub fn get(&self) -> Option<Credential> {
        self.token.lock().expect("store lock poisoned").clone()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn read(&self) -> Result<Credential, AuthError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.get().ok_or(AuthError::NotFound)
    }

    fn write(&self, credential: &Credential) -> Result<(), AuthError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().expect("store lock poisoned") = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

pub fn credential(value: &str) -> Credential {
    Credential::new(value).expect("non-blank credential")
}
