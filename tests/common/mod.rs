use async_trait::async_trait;
use chess_chat_app::{CompletionError, CompletionService, GameConfig, GameSession};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One canned behaviour of the fake model
#[allow(dead_code)]
pub enum Step {
    Reply(&'static str),
    Late(Duration, &'static str),
    Hang,
    Fail,
    Unconfigured,
}

/// Completion service that plays back a script and records every prompt
#[derive(Default)]
pub struct ScriptedModel {
    steps: Mutex<VecDeque<Step>>,
    prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        Arc::new(ScriptedModel {
            steps: Mutex::new(steps.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.steps.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionService for ScriptedModel {
    async fn complete(&self, prompt: &str, _max_tokens: u32) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let step = self.steps.lock().unwrap().pop_front();

        match step {
            Some(Step::Reply(text)) => Ok(text.to_string()),
            Some(Step::Late(delay, text)) => {
                actix_rt::time::sleep(delay).await;
                Ok(text.to_string())
            }
            Some(Step::Hang) => {
                actix_rt::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
            Some(Step::Fail) => Err(CompletionError::Status {
                status: 503,
                body: "overloaded".to_string(),
            }),
            Some(Step::Unconfigured) => Err(CompletionError::Misconfigured("no API key set".to_string())),
            None => Err(CompletionError::EmptyReply),
        }
    }
}

/// Default settings with a short deadline so timeouts stay fast
#[allow(dead_code)]
pub fn quick_config() -> GameConfig {
    GameConfig {
        completion_timeout_ms: 40,
        ..GameConfig::default()
    }
}

#[allow(dead_code)]
pub fn session(model: &Arc<ScriptedModel>) -> GameSession {
    GameSession::new(model.clone(), quick_config())
}
