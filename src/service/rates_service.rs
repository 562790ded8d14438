//! Transport-neutral request handling for the two public operations.
//!
//! A wire layer (stdin/stdout JSON lines in the bundled binary, or any RPC
//! framework) decodes its messages into these request types, hands them to
//! [`RatesService`], and encodes the [`RatesResponse`] it gets back.

use crate::core::error::{ConversionError, ErrorCategory};
use crate::engine::converter::CurrencyConverter;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Publish `1 base_currency = price quote_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    pub base_currency: String,
    pub quote_currency: String,
    pub price: String,
}

/// Convert `from_amount` of `from_currency` into `to_currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: String,
}

/// Converted amount, always with four fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub price: String,
}

/// Outcome code reported to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    InvalidArgument,
    NotFound,
    Internal,
}

impl From<ErrorCategory> for Status {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::InvalidInput => Self::InvalidArgument,
            ErrorCategory::NotFound => Self::NotFound,
            ErrorCategory::Internal => Self::Internal,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
        };
        write!(f, "{}", name)
    }
}

/// A failed call as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}: {source}")]
pub struct ServiceError {
    pub status: Status,
    pub source: ConversionError,
}

impl From<ConversionError> for ServiceError {
    fn from(source: ConversionError) -> Self {
        Self {
            status: source.category().into(),
            source,
        }
    }
}

/// Either operation, tagged by `op` on the wire.
///
/// ```json
/// {"op": "publish", "base_currency": "BTC", "quote_currency": "EUR", "price": "50000"}
/// {"op": "convert", "from_currency": "BTC", "to_currency": "EUR", "from_amount": "1"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RatesRequest {
    Publish(PublishRequest),
    Convert(ConvertRequest),
}

/// Uniform reply for [`RatesRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatesResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RatesResponse {
    pub fn ok(price: Option<String>) -> Self {
        Self {
            status: Status::Ok,
            price,
            message: None,
        }
    }

    pub fn error(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            price: None,
            message: Some(message.into()),
        }
    }
}

impl From<ServiceError> for RatesResponse {
    fn from(err: ServiceError) -> Self {
        Self::error(err.status, err.source.to_string())
    }
}

/// Request handler wrapping a shared [`CurrencyConverter`].
#[derive(Debug, Clone)]
pub struct RatesService {
    converter: Arc<CurrencyConverter>,
}

impl RatesService {
    pub fn new(converter: Arc<CurrencyConverter>) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn publish(&self, request: &PublishRequest) -> Result<(), ServiceError> {
        match self.converter.add_rate(
            request.base_currency.as_str(),
            request.quote_currency.as_str(),
            &request.price,
        ) {
            Ok(()) => {
                info!(
                    "Currency rate was published: {}/{} = {}",
                    request.base_currency, request.quote_currency, request.price
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "Can't publish rate {}/{} = '{}': {}",
                    request.base_currency, request.quote_currency, request.price, err
                );
                Err(err.into())
            }
        }
    }

    pub fn convert(&self, request: &ConvertRequest) -> Result<ConvertResponse, ServiceError> {
        debug!(
            "Trying to convert from currency: '{}', to currency: '{}', from amount: '{}'",
            request.from_currency, request.to_currency, request.from_amount
        );

        match self.converter.convert(
            request.from_currency.as_str(),
            request.to_currency.as_str(),
            &request.from_amount,
        ) {
            Ok(amount) => {
                info!(
                    "Currency was converted. From: '{} {}', To: '{} {}'",
                    request.from_amount, request.from_currency, amount, request.to_currency
                );
                Ok(ConvertResponse {
                    price: amount.to_string(),
                })
            }
            Err(err) => {
                error!(
                    "Can't convert from currency: '{}', to currency: '{}', from amount: '{}': {}",
                    request.from_currency, request.to_currency, request.from_amount, err
                );
                Err(err.into())
            }
        }
    }

    /// Dispatch a tagged request and fold the outcome into a response.
    pub fn handle(&self, request: &RatesRequest) -> RatesResponse {
        let outcome = match request {
            RatesRequest::Publish(publish) => self.publish(publish).map(|()| None),
            RatesRequest::Convert(convert) => self.convert(convert).map(|r| Some(r.price)),
        };
        match outcome {
            Ok(price) => RatesResponse::ok(price),
            Err(err) => err.into(),
        }
    }
}
