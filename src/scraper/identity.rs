use crate::error::SetupError;
use std::fmt;
use std::sync::Arc;

/// Picks an index in `0..len`. `len` is never zero.
pub type IndexPicker = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Read-only set of User-Agent strings, one drawn per request.
#[derive(Clone)]
pub struct IdentityPool {
    identities: Arc<[String]>,
    picker: IndexPicker,
}

impl IdentityPool {
    /// Uniform random selection.
    pub fn new(identities: Vec<String>) -> Result<Self, SetupError> {
        Self::with_picker(identities, Arc::new(|len: usize| rand::random_range(0..len)))
    }

    pub fn with_picker(identities: Vec<String>, picker: IndexPicker) -> Result<Self, SetupError> {
        if identities.is_empty() {
            return Err(SetupError::EmptyIdentityPool);
        }
        Ok(Self {
            identities: identities.into(),
            picker,
        })
    }

    pub fn pick(&self) -> &str {
        let len = self.identities.len();
        // Clamp so a misbehaving picker cannot index out of bounds.
        let i = (self.picker)(len).min(len - 1);
        &self.identities[i]
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl fmt::Debug for IdentityPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityPool")
            .field("identities", &self.identities.len())
            .finish()
    }
}
