//! Journeys module - domain models, services, and traits.

mod journeys_model;
mod journeys_service;
mod journeys_traits;


pub use journeys_model::{BreakInterval, Journey, NewJourney};
pub use journeys_service::JourneyService;
pub use journeys_traits::{JourneyRepositoryTrait, JourneyServiceTrait};
