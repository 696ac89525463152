//! `{ "data": T }` envelope shared by every success response.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// JSON body of a successful handler.
pub type Envelope<T> = Json<DataResponse<T>>;

/// Wrap a handler result in the data envelope.
pub fn data<T: Serialize>(data: T) -> Envelope<T> {
    Json(DataResponse { data })
}
