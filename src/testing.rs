// In-memory fakes for the network and the clock.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::api::Remote;
use crate::error::{Error, Result};
use crate::fetch::Sleep;

#[derive(Debug, Clone)]
enum Body {
    Json(Value),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone)]
struct Route {
    failures_left: u32,
    body: Body,
}

/// Scripted stand-in for the PokéAPI. Unknown URLs answer 404.
#[derive(Debug, Default)]
pub struct FakeRemote {
    routes: RefCell<HashMap<String, Route>>,
    calls: RefCell<Vec<String>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `value` at `url`.
    pub fn json(self, url: &str, value: Value) -> Self {
        self.route(url, 0, Body::Json(value))
    }

    /// Serve `value` at `url` after answering 500 `failures` times.
    pub fn flaky_json(self, url: &str, failures: u32, value: Value) -> Self {
        self.route(url, failures, Body::Json(value))
    }

    /// Serve raw bytes at `url`.
    pub fn bytes(self, url: &str, bytes: &[u8]) -> Self {
        self.route(url, 0, Body::Bytes(bytes.to_vec()))
    }

    fn route(self, url: &str, failures_left: u32, body: Body) -> Self {
        self.routes.borrow_mut().insert(
            url.to_string(),
            Route {
                failures_left,
                body,
            },
        );
        self
    }

    /// Every URL requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == url).count()
    }

    fn respond(&self, url: &str) -> Result<Body> {
        self.calls.borrow_mut().push(url.to_string());

        let mut routes = self.routes.borrow_mut();
        let Some(route) = routes.get_mut(url) else {
            return Err(Error::Status {
                status: StatusCode::NOT_FOUND,
                url: url.to_string(),
            });
        };
        if route.failures_left > 0 {
            route.failures_left -= 1;
            return Err(Error::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: url.to_string(),
            });
        }
        Ok(route.body.clone())
    }
}

impl Remote for FakeRemote {
    async fn get_json(&self, url: &str) -> Result<Value> {
        match self.respond(url)? {
            Body::Json(value) => Ok(value),
            Body::Bytes(_) => Err(Error::Other(format!("{} is not JSON", url))),
        }
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        match self.respond(url)? {
            Body::Bytes(bytes) => Ok(bytes),
            Body::Json(value) => Ok(value.to_string().into_bytes()),
        }
    }
}

/// Sleeper that returns immediately and remembers what it was asked.
#[derive(Debug, Default)]
pub struct RecordingSleep {
    sleeps: RefCell<Vec<Duration>>,
}

impl RecordingSleep {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Sleep for RecordingSleep {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}
