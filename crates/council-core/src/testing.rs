//! In-memory stand-ins for the generation and console seams.

use crate::interaction::Console;
use council_llm::TextGenerator;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// Answers generation calls from a fixed script; exhausted scripts yield `None`.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Option<String>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| r.map(Into::into)).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn models(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }
}

impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.map(str::to_string)));
        self.responses.lock().unwrap().pop_front().flatten()
    }
}

/// Replays scripted answers and records everything shown and asked.
#[derive(Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub shown: Vec<String>,
    pub asked: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn show(&mut self, text: &str) -> io::Result<()> {
        self.shown.push(text.to_string());
        Ok(())
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .map(|a| a.trim().to_string())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}
