use crate::error::TablecastError;
use crate::sync::ObserverId;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{HeaderName, request::Parts},
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header a registered client uses to say which observer stream is its own.
pub const X_OBSERVER_ID: HeaderName = HeaderName::from_static("x-observer-id");

/// The observer that issued the request, if the client named one.
#[derive(Debug, Clone, Copy)]
pub struct Originator(pub Option<ObserverId>);

impl<S> FromRequestParts<S> for Originator
where
    S: Send + Sync,
{
    type Rejection = TablecastError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(X_OBSERVER_ID) else {
            return Ok(Originator(None));
        };
        let text = raw
            .to_str()
            .map_err(|_| TablecastError::InvalidObserverId("<non-ascii>".to_string()))?;
        text.parse()
            .map(|id| Originator(Some(id)))
            .map_err(|_| TablecastError::InvalidObserverId(text.to_string()))
    }
}

/// `Json<T>` whose rejection renders as our standard error body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = TablecastError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(body)) => Ok(JsonBody(body)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected request body");
                Err(TablecastError::InvalidBody(rejection.body_text()))
            }
        }
    }
}

/// `Path<T>` whose rejection renders as our standard error body.
pub struct PathParams<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = TablecastError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(params)) => Ok(PathParams(params)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected path parameters");
                Err(TablecastError::InvalidPath(rejection.body_text()))
            }
        }
    }
}
