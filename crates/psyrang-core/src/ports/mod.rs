//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no transport details and use only domain
//! and wire types.

pub mod generative;

pub use generative::{
    Candidate, CandidateContent, CandidatePart, GenerateContentRequest, GenerateContentResponse,
    GenerativeApiPort, PromptFeedback, RequestContent, RequestPart, UpstreamError,
};
