//! 测试用 HTTP 客户端
//!
//! 按 (方法, URL 后缀) 匹配预设响应，并记录所有发出的请求。
//! 同一路由的多条预设按顺序消费，最后一条保留，可重复命中。

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use odyssey_shared::protocol::HttpMethod;

use super::http::{HttpClient, HttpError, HttpRequest, HttpResponse};

#[derive(Debug, Clone)]
struct Rule {
    method: HttpMethod,
    suffix: String,
    reply: Result<HttpResponse, HttpError>,
}

#[derive(Debug, Clone, Default)]
pub struct MockClient {
    rules: Rc<RefCell<Vec<Rule>>>,
    sent: Rc<RefCell<Vec<HttpRequest>>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: HttpMethod, suffix: &str, status: u16, body: &str) -> &Self {
        self.rules.borrow_mut().push(Rule {
            method,
            suffix: suffix.to_string(),
            reply: Ok(HttpResponse::new(status, body)),
        });
        self
    }

    pub fn fail(&self, method: HttpMethod, suffix: &str) -> &Self {
        self.rules.borrow_mut().push(Rule {
            method,
            suffix: suffix.to_string(),
            reply: Err(HttpError::NetworkError("connection refused".to_string())),
        });
        self
    }

    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.borrow().clone()
    }

    /// 已发出请求的 "METHOD url" 摘要
    pub fn calls(&self) -> Vec<String> {
        self.sent
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method.as_str(), r.url))
            .collect()
    }
}

#[async_trait(?Send)]
impl HttpClient for MockClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.sent.borrow_mut().push(request.clone());

        let mut rules = self.rules.borrow_mut();
        let matching: Vec<usize> = rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.method == request.method && request.url.ends_with(&rule.suffix))
            .map(|(index, _)| index)
            .collect();

        match matching.as_slice() {
            [] => Ok(HttpResponse::new(404, r#"{"error": "no mock"}"#)),
            [only] => rules[*only].reply.clone(),
            [first, ..] => rules.remove(*first).reply,
        }
    }
}
