//! Client side of the checkout endpoint.
//!
//! [`submit_checkout`] drives a [`CheckoutForm`] through one submission:
//! validate, POST, then apply the outcome to the form. The HTTP call sits
//! behind [`CheckoutApi`] so the form flow can be exercised without a server.

use async_trait::async_trait;
use marketplace_core::{
    CheckoutErrorBody, CheckoutForm, CheckoutRequest, CheckoutResponse, FormError, FormMessage,
    SubmitError,
};
use reqwest::Client;
use url::Url;

/// Path of the order endpoint, relative to the storefront root.
pub const CHECKOUT_PATH: &str = "/api/checkout";

/// Something that can place an order on the storefront's behalf.
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Send one checkout request.
    ///
    /// A non-2xx answer carrying an `error` field is [`SubmitError::Api`];
    /// anything else that fails is [`SubmitError::Transport`].
    async fn submit(&self, request: &CheckoutRequest)
    -> Result<CheckoutResponse, SubmitError>;
}

/// [`CheckoutApi`] over HTTP.
#[derive(Clone)]
pub struct HttpCheckoutClient {
    client: Client,
    endpoint: Url,
}

impl HttpCheckoutClient {
    /// Create a client for the storefront served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let endpoint = Url::parse(base_url)?.join(CHECKOUT_PATH)?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    /// The full URL orders are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutClient {
    async fn submit(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutResponse, SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| SubmitError::Transport(e.to_string()));
        }

        tracing::warn!(status = %status, "Checkout rejected");
        match serde_json::from_str::<CheckoutErrorBody>(&body) {
            Ok(err) => Err(SubmitError::Api(err.error)),
            Err(_) => Err(SubmitError::Transport(format!("unexpected status {status}"))),
        }
    }
}

/// Submit the form once and return the banner it now shows.
///
/// # Errors
///
/// Returns the form's validation error without contacting `api` if the form
/// is not ready to submit. Server and network failures are not errors here;
/// they come back as [`FormMessage::Error`].
pub async fn submit_checkout(
    form: &mut CheckoutForm,
    api: &dyn CheckoutApi,
) -> Result<FormMessage, FormError> {
    let request = form.begin_submit()?;
    let outcome = api.submit(&request).await;
    if let Err(err) = &outcome {
        tracing::error!(error = %err, "Error placing order");
    }
    form.finish_submit(outcome).cloned()
}
