//! Hub collaborators: trait abstractions, the HTTP client, and the test mock.

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpHub;
pub use mock::MockHub;
pub use traits::{
    CastLookup, ChannelLookup, HubError, HubResult, NameLookup, RelayClient, SignerProvider,
    SubmissionOutcome,
};
