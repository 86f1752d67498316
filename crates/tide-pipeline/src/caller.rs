//! Model invocation seam.
//!
//! The pipeline never holds a concrete HTTP client; stages take any
//! [`ModelCaller`] so composition decides the real client and tests script
//! replies. Implementations inherit the resilient-client contract: the
//! returned string is model output or a fixed user-facing failure reply,
//! never a raised error.

/// One text-in/text-out completion call.
#[allow(async_fn_in_trait)]
pub trait ModelCaller {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> String;
}

impl ModelCaller for tide_model::ModelClient {
    async fn call(&self, system_prompt: &str, user_prompt: &str) -> String {
        tide_model::ModelClient::call(self, system_prompt, user_prompt).await
    }
}
