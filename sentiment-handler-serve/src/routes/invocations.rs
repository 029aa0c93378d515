use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use sentiment_handler::{ContentType, JSON_CONTENT_TYPE};
use sentiment_handler_pipelines::SentimentHandler;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use crate::responses::ErrorResponse;
use crate::workers::{task_distributor, InferenceState, InferenceTask};

/// A raw request with its negotiated media types.
#[derive(Debug)]
pub(crate) struct InvocationRequest {
    body: Bytes,
    content_type: String,
    accept: String,
}

#[derive(Debug)]
pub(crate) struct InvocationResponse {
    body: String,
    content_type: ContentType,
}

type InvocationResult = Result<InvocationResponse, ErrorResponse>;
type InvocationState = InferenceState<InvocationRequest, InvocationResult>;

pub(crate) fn router(handler: Arc<SentimentHandler>, num_workers: usize) -> Router {
    let (tx, rx) = mpsc::channel::<InferenceTask<InvocationRequest, InvocationResult>>(32);

    tokio::spawn(task_distributor::<SentimentHandler, InvocationRequest, InvocationResult>(
        rx,
        handler,
        num_workers,
        Arc::new(process_invocation),
    ));

    let state = InferenceState { tx };

    Router::new()
        .route("/invocations", post(invocations))
        .with_state(state)
}

fn process_invocation(handler: &SentimentHandler, request: InvocationRequest) -> InvocationResult {
    let (body, content_type) =
        handler.invoke(&request.body, &request.content_type, &request.accept)?;
    Ok(InvocationResponse { body, content_type })
}

fn header_value(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).trim().to_string()
}

/// The declared media type of the body, JSON if there is none.
pub(crate) fn request_content_type(headers: &HeaderMap) -> String {
    match headers.get(header::CONTENT_TYPE).map(header_value) {
        Some(content_type) if !content_type.is_empty() => content_type,
        _ => JSON_CONTENT_TYPE.to_string(),
    }
}

/// The media type to answer with. JSON is picked when there is no `Accept` header or when any of
/// the listed media ranges allows it; otherwise the raw header is returned so the encoder can
/// reject it.
pub(crate) fn response_accept(headers: &HeaderMap) -> String {
    let accept = match headers.get(header::ACCEPT).map(header_value) {
        Some(accept) if !accept.is_empty() => accept,
        _ => return JSON_CONTENT_TYPE.to_string(),
    };

    let accepts_json = accept.split(',').any(|range| {
        let media_range = range.split(';').next().unwrap_or_default().trim();
        media_range == "*/*" || ContentType::parse(media_range).is_some()
    });

    if accepts_json {
        JSON_CONTENT_TYPE.to_string()
    } else {
        accept
    }
}

pub(crate) async fn invocations(
    State(state): State<InvocationState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ErrorResponse> {
    let req = InvocationRequest {
        content_type: request_content_type(&headers),
        accept: response_accept(&headers),
        body,
    };
    let (resp_tx, resp_rx) = oneshot::channel();
    let task = InferenceTask { req, resp_tx };

    if let Err(e) = state.tx.send(task).await {
        tracing::error!("Failed to send task to worker: {}", e);
        return Err(ErrorResponse::internal("Failed to process request"));
    }

    match resp_rx.await {
        Ok(response) => {
            let response = response?;
            Ok((
                [(header::CONTENT_TYPE, response.content_type.as_str())],
                response.body,
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Failed to receive response from worker: {}", e);
            Err(ErrorResponse::internal("Failed to process request"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use axum::http::StatusCode;
    use candle_core::Device;
    use candle_nn::{VarBuilder, VarMap};
    use sentiment_handler_models::{BertConfig, PreTrainedModel, SentimentClassifier, BERT_DTYPE};
    use sentiment_handler_tokenizers::{BertTokenizerBuilder, TokenizerBuilder, TokenizerInfo};

    fn tiny_handler() -> Arc<SentimentHandler> {
        let vocab: HashMap<String, u32> = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "good"]
            .iter()
            .enumerate()
            .map(|(i, token)| (token.to_string(), i as u32))
            .collect();
        let config = BertConfig {
            vocab_size: vocab.len(),
            hidden_size: 8,
            num_hidden_layers: 1,
            num_attention_heads: 2,
            intermediate_size: 16,
            max_position_embeddings: 16,
            ..Default::default()
        };
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, BERT_DTYPE, &Device::Cpu);
        let model = SentimentClassifier::load(vb, config).unwrap();
        let tokenizer = BertTokenizerBuilder::new(TokenizerInfo::new(None, None, Some(vocab)))
            .with_max_length(8)
            .build()
            .unwrap();
        Arc::new(SentimentHandler::new(
            Arc::new(model),
            Arc::new(tokenizer),
            &Device::Cpu,
        ))
    }

    fn test_state() -> InvocationState {
        let (tx, rx) = mpsc::channel(8);
        tokio::spawn(
            task_distributor::<SentimentHandler, InvocationRequest, InvocationResult>(
                rx,
                tiny_handler(),
                1,
                Arc::new(process_invocation),
            ),
        );
        InferenceState { tx }
    }

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(name.clone(), HeaderValue::from_static(*value));
        }
        headers
    }

    #[test]
    fn test_header_defaults() {
        let empty = HeaderMap::new();
        assert_eq!(request_content_type(&empty), JSON_CONTENT_TYPE);
        assert_eq!(response_accept(&empty), JSON_CONTENT_TYPE);

        let any = headers(&[(header::ACCEPT, "*/*")]);
        assert_eq!(response_accept(&any), JSON_CONTENT_TYPE);

        let listed = headers(&[(header::ACCEPT, "text/html, application/json;q=0.9")]);
        assert_eq!(response_accept(&listed), JSON_CONTENT_TYPE);

        let xml = headers(&[
            (header::ACCEPT, "text/xml"),
            (header::CONTENT_TYPE, "text/csv"),
        ]);
        assert_eq!(response_accept(&xml), "text/xml");
        assert_eq!(request_content_type(&xml), "text/csv");
    }

    #[tokio::test]
    async fn test_invocation() {
        let response = invocations(
            State(test_state()),
            headers(&[(header::CONTENT_TYPE, "application/json")]),
            Bytes::from_static(br#"{"text": "good"}"#),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            JSON_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_invocation_errors() {
        let state = test_state();
        let body = Bytes::from_static(br#"{"text": "good"}"#);

        let err = invocations(
            State(state.clone()),
            headers(&[(header::CONTENT_TYPE, "text/csv")]),
            body.clone(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err = invocations(
            State(state.clone()),
            headers(&[(header::ACCEPT, "text/xml")]),
            body,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), StatusCode::NOT_ACCEPTABLE);

        let err = invocations(
            State(state),
            HeaderMap::new(),
            Bytes::from_static(br#"{"review": "good"}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
    }
}
