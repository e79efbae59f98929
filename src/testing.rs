//! In-memory gateway for controller tests.
//!
//! Each operation replays a queue of canned responses; the last response
//! repeats once the queue is down to one. Every call is recorded so tests
//! can assert what did, or did not, reach the network.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;

use crate::api::{ApiGateway, ClientError, ClientResult};
use crate::models::{DatasetId, DatasetSummary, Report, Session};
use crate::upload::UploadFile;

/// A recorded gateway call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Login { username: String },
    Register { username: String, email: Option<String> },
    Upload { file: String, token: Option<String> },
    History { token: Option<String> },
    Report { id: DatasetId, token: Option<String> },
}

struct Script<T>(RefCell<VecDeque<ClientResult<T>>>);

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self(RefCell::new(VecDeque::new()))
    }

    fn push(&self, response: ClientResult<T>) {
        self.0.borrow_mut().push_back(response);
    }

    fn next(&self) -> ClientResult<T> {
        let mut queue = self.0.borrow_mut();
        if queue.len() > 1 {
            return queue.pop_front().unwrap();
        }
        queue
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ClientError::Network("no scripted response".to_string())))
    }
}

pub struct ScriptedGateway {
    login: Script<Session>,
    register: Script<Session>,
    upload: Script<DatasetSummary>,
    history: Script<Vec<DatasetSummary>>,
    report: Script<Vec<u8>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            login: Script::new(),
            register: Script::new(),
            upload: Script::new(),
            history: Script::new(),
            report: Script::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn on_login(self, response: ClientResult<Session>) -> Self {
        self.login.push(response);
        self
    }

    pub fn on_register(self, response: ClientResult<Session>) -> Self {
        self.register.push(response);
        self
    }

    pub fn on_upload(self, response: ClientResult<DatasetSummary>) -> Self {
        self.upload.push(response);
        self
    }

    pub fn on_history(self, response: ClientResult<Vec<DatasetSummary>>) -> Self {
        self.history.push(response);
        self
    }

    pub fn on_report(self, response: ClientResult<Vec<u8>>) -> Self {
        self.report.push(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn token(session: Option<&Session>) -> Option<String> {
    session.map(|s| s.token.clone())
}

#[async_trait(?Send)]
impl ApiGateway for ScriptedGateway {
    async fn login(&self, username: &str, _password: &str) -> ClientResult<Session> {
        self.record(Call::Login { username: username.to_string() });
        self.login.next()
    }

    async fn register(
        &self,
        username: &str,
        _password: &str,
        email: Option<&str>,
    ) -> ClientResult<Session> {
        self.record(Call::Register {
            username: username.to_string(),
            email: email.map(str::to_string),
        });
        self.register.next()
    }

    async fn upload(
        &self,
        session: Option<&Session>,
        file: &UploadFile,
    ) -> ClientResult<DatasetSummary> {
        self.record(Call::Upload {
            file: file.name().to_string(),
            token: token(session),
        });
        self.upload.next()
    }

    async fn list_history(&self, session: Option<&Session>) -> ClientResult<Vec<DatasetSummary>> {
        self.record(Call::History { token: token(session) });
        self.history.next()
    }

    async fn fetch_report(
        &self,
        session: Option<&Session>,
        dataset_id: DatasetId,
    ) -> ClientResult<Report> {
        self.record(Call::Report {
            id: dataset_id,
            token: token(session),
        });
        self.report.next().map(|bytes| Report { dataset_id, bytes })
    }
}
