use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::Dog;
use crate::services::{CatalogApi, CatalogError};

/// Ask the service to pick one dog from `favorite_ids` and fetch its record.
///
/// Fails with [`CatalogError::Precondition`] before any request when
/// `favorite_ids` is empty.
pub async fn generate_match<C: CatalogApi>(
    api: &C,
    favorite_ids: &[String],
) -> Result<Dog, CatalogError> {
    if favorite_ids.is_empty() {
        return Err(CatalogError::Precondition(
            "add at least one favorite before generating a match".to_string(),
        ));
    }

    let matched = api.get_match(favorite_ids).await?;
    tracing::debug!("Match service picked {} from {} favorites", matched, favorite_ids.len());

    api.get_dogs(std::slice::from_ref(&matched))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CatalogError::InvalidResponse(format!("Matched dog {} not found", matched)))
}

/// Match modal state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchPhase {
    #[default]
    Idle,
    Resolving,
    /// Stays here until closed
    Presenting(Dog),
}

impl MatchPhase {
    /// Idle -> Resolving
    pub fn begin(&mut self) -> Result<(), CatalogError> {
        match self {
            MatchPhase::Idle => {
                *self = MatchPhase::Resolving;
                Ok(())
            }
            MatchPhase::Resolving => Err(CatalogError::Precondition(
                "a match is already being resolved".to_string(),
            )),
            MatchPhase::Presenting(_) => Err(CatalogError::Precondition(
                "close the current match first".to_string(),
            )),
        }
    }

    /// Resolving -> Presenting on success, Resolving -> Idle on failure
    pub fn finish(&mut self, result: Result<Dog, CatalogError>) -> Result<Dog, CatalogError> {
        match result {
            Ok(dog) => {
                *self = MatchPhase::Presenting(dog.clone());
                Ok(dog)
            }
            Err(e) => {
                *self = MatchPhase::Idle;
                Err(e)
            }
        }
    }

    /// Back to Idle from any phase
    pub fn close(&mut self) {
        *self = MatchPhase::Idle;
    }

    pub fn presented(&self) -> Option<&Dog> {
        match self {
            MatchPhase::Presenting(dog) => Some(dog),
            _ => None,
        }
    }
}

/// Runs [`generate_match`] and tracks the modal phase around it
pub struct MatchWorkflow<C> {
    api: Arc<C>,
    phase: Mutex<MatchPhase>,
}

impl<C: CatalogApi> MatchWorkflow<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self {
            api,
            phase: Mutex::new(MatchPhase::Idle),
        }
    }

    pub async fn phase(&self) -> MatchPhase {
        self.phase.lock().await.clone()
    }

    /// Generate a match for `favorite_ids`. The caller's favorite set is
    /// only read.
    pub async fn generate(&self, favorite_ids: &[String]) -> Result<Dog, CatalogError> {
        if favorite_ids.is_empty() {
            return Err(CatalogError::Precondition(
                "add at least one favorite before generating a match".to_string(),
            ));
        }

        self.phase.lock().await.begin()?;

        let result = generate_match(self.api.as_ref(), favorite_ids).await;
        if let Err(e) = &result {
            tracing::error!("Failed to generate match: {}", e);
        }

        self.phase.lock().await.finish(result)
    }

    pub async fn close(&self) {
        self.phase.lock().await.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.to_string(),
            name: "Luna".to_string(),
            breed: "Husky".to_string(),
            age: 4,
            zip_code: "73301".to_string(),
            img: String::new(),
        }
    }

    #[test]
    fn test_phase_success_path() {
        let mut phase = MatchPhase::default();
        phase.begin().unwrap();
        assert_eq!(phase, MatchPhase::Resolving);

        phase.finish(Ok(dog("d2"))).unwrap();
        assert_eq!(phase.presented().map(|d| d.id.as_str()), Some("d2"));

        // Presenting is terminal until closed
        assert!(phase.begin().unwrap_err().is_precondition());

        phase.close();
        assert_eq!(phase, MatchPhase::Idle);
    }

    #[test]
    fn test_phase_failure_returns_to_idle() {
        let mut phase = MatchPhase::default();
        phase.begin().unwrap();

        let err = phase
            .finish(Err(CatalogError::Api { status: 500, message: "boom".into() }))
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(phase, MatchPhase::Idle);
    }

    #[test]
    fn test_cannot_begin_twice() {
        let mut phase = MatchPhase::default();
        phase.begin().unwrap();
        assert!(phase.begin().is_err());
        assert_eq!(phase, MatchPhase::Resolving);
    }
}
