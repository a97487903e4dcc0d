//! Copy generator adapters.

mod mock_copywriter;
mod openai_copywriter;

pub use mock_copywriter::MockCopywriter;
pub use openai_copywriter::{OpenAiConfig, OpenAiCopywriter};
