//! Backend request construction.
//!
//! Every operation is described by a static [`OperationSpec`]: endpoint, method and a field
//! table. A single builder walks the table, so the omission and renaming rules live in one
//! place instead of five.

use crate::config::Credentials;
use crate::params::OperationParams;
use reqwest::Method;
use serde_json::{Map, Value, json};

/// The five operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AnswerQuestion,
    AnswerDataQuestion,
    AnswerMetadataQuestion,
    SimilaritySearch,
    GetMetadata,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::AnswerQuestion,
        Operation::AnswerDataQuestion,
        Operation::AnswerMetadataQuestion,
        Operation::SimilaritySearch,
        Operation::GetMetadata,
    ];

    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            Operation::AnswerQuestion => "answer_question",
            Operation::AnswerDataQuestion => "answer_data_question",
            Operation::AnswerMetadataQuestion => "answer_metadata_question",
            Operation::SimilaritySearch => "similarity_search",
            Operation::GetMetadata => "get_metadata",
        }
    }

    #[must_use]
    pub fn from_tool_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.tool_name() == name)
    }

    #[must_use]
    pub fn spec(self) -> &'static OperationSpec {
        match self {
            Operation::AnswerQuestion => &ANSWER_QUESTION,
            Operation::AnswerDataQuestion => &ANSWER_DATA_QUESTION,
            Operation::AnswerMetadataQuestion => &ANSWER_METADATA_QUESTION,
            Operation::SimilaritySearch => &SIMILARITY_SEARCH,
            Operation::GetMetadata => &GET_METADATA,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl Fixed {
    fn to_value(self) -> Value {
        match self {
            Fixed::Bool(b) => Value::Bool(b),
            Fixed::Int(i) => json!(i),
            Fixed::Str(s) => Value::String(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Always sent, taken from the caller's argument.
    Always,
    /// Sent only when the argument is present and not an empty string.
    OmitEmpty,
    /// Constant value; the caller cannot change it.
    Fixed(Fixed),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Parameter name on the caller side.
    pub arg: &'static str,
    /// Name used on the wire (query key or JSON body key).
    pub wire: &'static str,
    pub rule: Rule,
}

impl Field {
    const fn always(name: &'static str) -> Self {
        Self {
            arg: name,
            wire: name,
            rule: Rule::Always,
        }
    }

    const fn omit_empty(name: &'static str) -> Self {
        Self {
            arg: name,
            wire: name,
            rule: Rule::OmitEmpty,
        }
    }

    const fn renamed(arg: &'static str, wire: &'static str) -> Self {
        Self {
            arg,
            wire,
            rule: Rule::Always,
        }
    }

    const fn fixed(wire: &'static str, value: Fixed) -> Self {
        Self {
            arg: wire,
            wire,
            rule: Rule::Fixed(value),
        }
    }
}

#[derive(Debug)]
pub struct OperationSpec {
    pub endpoint: &'static str,
    pub verb: Verb,
    pub fields: &'static [Field],
}

const MARKDOWN_RESPONSE: Field = Field::fixed("markdown_response", Fixed::Bool(true));
const VERBOSE: Field = Field::fixed("verbose", Fixed::Bool(true));

static ANSWER_QUESTION: OperationSpec = OperationSpec {
    endpoint: "answerQuestion",
    verb: Verb::Post,
    fields: &[
        Field::always("question"),
        Field::always("plot"),
        Field::always("mode"),
        MARKDOWN_RESPONSE,
        VERBOSE,
        Field::omit_empty("use_views"),
        Field::omit_empty("custom_instructions"),
    ],
};

static ANSWER_DATA_QUESTION: OperationSpec = OperationSpec {
    endpoint: "answerDataQuestion",
    verb: Verb::Post,
    fields: &[
        Field::always("question"),
        Field::always("plot"),
        MARKDOWN_RESPONSE,
        VERBOSE,
        Field::omit_empty("use_views"),
    ],
};

static ANSWER_METADATA_QUESTION: OperationSpec = OperationSpec {
    endpoint: "answerMetadataQuestion",
    verb: Verb::Post,
    fields: &[Field::always("question"), MARKDOWN_RESPONSE, VERBOSE],
};

static SIMILARITY_SEARCH: OperationSpec = OperationSpec {
    endpoint: "similaritySearch",
    verb: Verb::Get,
    fields: &[
        Field::always("query"),
        Field::always("n_results"),
        Field::fixed("scores", Fixed::Bool(true)),
    ],
};

static GET_METADATA: OperationSpec = OperationSpec {
    endpoint: "getMetadata",
    verb: Verb::Get,
    fields: &[
        Field::renamed("database_names", "vdp_database_names"),
        Field::always("insert"),
        Field::always("overwrite"),
        Field::fixed("examples_per_table", Fixed::Int(3)),
        Field::fixed("descriptions", Fixed::Str("true")),
        Field::fixed("associations", Fixed::Str("true")),
    ],
};

/// Outgoing payload. GET requests carry query pairs, POST requests a JSON body; never both.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Query(Vec<(String, String)>),
    Json(Value),
}

#[derive(Debug, Clone)]
pub struct BackendRequest {
    pub endpoint: String,
    pub method: Method,
    pub payload: Payload,
    pub credentials: Option<Credentials>,
}

impl BackendRequest {
    /// Look up a query parameter (GET requests only).
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        match &self.payload {
            Payload::Query(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            Payload::Json(_) => None,
        }
    }

    /// The JSON body (POST requests only).
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match &self.payload {
            Payload::Json(body) => Some(body),
            Payload::Query(_) => None,
        }
    }
}

/// Build the backend request for a typed parameter set.
#[must_use]
pub fn build_request<P: OperationParams>(
    params: &P,
    credentials: Option<Credentials>,
) -> BackendRequest {
    build_from_arguments(P::OPERATION.spec(), &params.arguments(), credentials)
}

/// Apply an operation's field table to a raw argument map.
#[must_use]
pub fn build_from_arguments(
    spec: &OperationSpec,
    arguments: &Map<String, Value>,
    credentials: Option<Credentials>,
) -> BackendRequest {
    let mut fields: Vec<(&'static str, Value)> = Vec::with_capacity(spec.fields.len());

    for field in spec.fields {
        let value = match field.rule {
            Rule::Fixed(v) => v.to_value(),
            Rule::Always => arguments.get(field.arg).cloned().unwrap_or(Value::Null),
            Rule::OmitEmpty => match arguments.get(field.arg) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if s.is_empty() => continue,
                Some(v) => v.clone(),
            },
        };
        fields.push((field.wire, value));
    }

    let payload = match spec.verb {
        Verb::Get => Payload::Query(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), query_value(&v)))
                .collect(),
        ),
        Verb::Post => Payload::Json(Value::Object(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )),
    };

    BackendRequest {
        endpoint: spec.endpoint.to_string(),
        method: spec.verb.method(),
        payload,
        credentials,
    }
}

/// Query-string form of a value: booleans become lowercase literals, numbers pass through.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        AnswerDataQuestionParams, AnswerMetadataQuestionParams, AnswerQuestionParams,
        GetMetadataParams, SimilaritySearchParams,
    };

    #[test]
    fn answer_question_omits_empty_optionals() {
        let req = build_request(&AnswerQuestionParams::new("How many loans?"), None);
        assert_eq!(req.endpoint, "answerQuestion");
        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.body(),
            Some(&json!({
                "question": "How many loans?",
                "plot": false,
                "mode": "default",
                "markdown_response": true,
                "verbose": true,
            }))
        );
        assert!(req.credentials.is_none());
    }

    #[test]
    fn answer_question_includes_non_empty_optionals_verbatim() {
        let params = AnswerQuestionParams {
            plot: true,
            mode: "data".to_string(),
            use_views: "bank.loans, bank.customers".to_string(),
            custom_instructions: "Answer in French".to_string(),
            ..AnswerQuestionParams::new("q")
        };
        let body = build_request(&params, None).body().cloned().expect("json body");
        assert_eq!(body["plot"], json!(true));
        assert_eq!(body["mode"], json!("data"));
        assert_eq!(body["use_views"], json!("bank.loans, bank.customers"));
        assert_eq!(body["custom_instructions"], json!("Answer in French"));
    }

    #[test]
    fn data_and_metadata_questions_use_their_own_endpoints() {
        let data = build_request(
            &AnswerDataQuestionParams {
                use_views: "bank.loans".to_string(),
                ..AnswerDataQuestionParams::new("q")
            },
            None,
        );
        assert_eq!(data.endpoint, "answerDataQuestion");
        let body = data.body().expect("json body");
        assert_eq!(body["use_views"], json!("bank.loans"));
        assert!(body.get("mode").is_none());

        let meta = build_request(&AnswerMetadataQuestionParams::new("q"), None);
        assert_eq!(meta.endpoint, "answerMetadataQuestion");
        assert_eq!(
            meta.body(),
            Some(&json!({"question": "q", "markdown_response": true, "verbose": true}))
        );
    }

    #[test]
    fn similarity_search_uses_query_parameters() {
        let params = SimilaritySearchParams {
            n_results: 2,
            ..SimilaritySearchParams::new("customer churn")
        };
        let req = build_request(&params, None);
        assert_eq!(req.method, Method::GET);
        assert!(req.body().is_none());
        assert_eq!(req.query_param("query"), Some("customer churn"));
        assert_eq!(req.query_param("n_results"), Some("2"));
        assert_eq!(req.query_param("scores"), Some("true"));
    }

    #[test]
    fn get_metadata_renames_and_lowercases() {
        let params = GetMetadataParams {
            overwrite: false,
            ..GetMetadataParams::new("bank")
        };
        let req = build_request(&params, None);
        assert_eq!(req.endpoint, "getMetadata");
        assert_eq!(req.query_param("vdp_database_names"), Some("bank"));
        assert_eq!(req.query_param("database_names"), None);
        assert_eq!(req.query_param("insert"), Some("true"));
        assert_eq!(req.query_param("overwrite"), Some("false"));
        assert_eq!(req.query_param("examples_per_table"), Some("3"));
        assert_eq!(req.query_param("descriptions"), Some("true"));
        assert_eq!(req.query_param("associations"), Some("true"));
    }

    #[test]
    fn credentials_are_carried_through() {
        let creds = Credentials::new("admin", "pw");
        let req = build_request(&AnswerMetadataQuestionParams::new("q"), creds.clone());
        assert_eq!(req.credentials, creds);
    }

    #[test]
    fn tool_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_tool_name(op.tool_name()), Some(op));
        }
        assert_eq!(Operation::from_tool_name("answerQuestion"), None);
    }
}
