//! Scripted browser doubles for unit tests

use crate::browser::error::{BrowserError, Result};
use crate::browser::session::{AnchorElement, BrowserSession};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct SessionLog {
    pub navigations: Vec<String>,
    pub scrolls: u32,
    pub closes: u32,
}

/// Replays a fixed sequence of document heights and a fixed anchor list
pub struct ScriptedSession {
    heights: VecDeque<u64>,
    last_height: u64,
    anchors: Vec<ScriptedAnchor>,
    log: Arc<Mutex<SessionLog>>,
    closed: bool,
    pub fail_navigation: bool,
    pub panic_on_navigation: bool,
}

impl ScriptedSession {
    pub fn new(heights: Vec<u64>, anchors: Vec<ScriptedAnchor>) -> Self {
        Self {
            heights: heights.into(),
            last_height: 0,
            anchors,
            log: Arc::new(Mutex::new(SessionLog::default())),
            closed: false,
            fail_navigation: false,
            panic_on_navigation: false,
        }
    }

    pub fn log(&self) -> Arc<Mutex<SessionLog>> {
        Arc::clone(&self.log)
    }
}

#[async_trait::async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        if self.panic_on_navigation {
            panic!("renderer crashed on {}", url);
        }
        if self.fail_navigation {
            return Err(BrowserError::Navigation(format!("{}: timed out", url)));
        }
        self.log.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64> {
        if let Some(height) = self.heights.pop_front() {
            self.last_height = height;
        }
        Ok(self.last_height)
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.log.lock().unwrap().scrolls += 1;
        Ok(())
    }

    async fn find_anchors(&mut self, _selector: &str) -> Result<Vec<Box<dyn AnchorElement>>> {
        Ok(self
            .anchors
            .iter()
            .cloned()
            .map(|a| Box::new(a) as Box<dyn AnchorElement>)
            .collect())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.log.lock().unwrap().closes += 1;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedAnchor {
    href: Option<String>,
    title: Option<String>,
    text: Option<String>,
    fail: bool,
}

impl ScriptedAnchor {
    pub fn new(href: Option<&str>, title: Option<&str>, text: Option<&str>) -> Self {
        Self {
            href: href.map(String::from),
            title: title.map(String::from),
            text: text.map(String::from),
            fail: false,
        }
    }

    /// An anchor whose every read fails, as if detached from the DOM
    pub fn failing() -> Self {
        Self {
            href: None,
            title: None,
            text: None,
            fail: true,
        }
    }
}

#[async_trait::async_trait]
impl AnchorElement for ScriptedAnchor {
    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        if self.fail {
            return Err(BrowserError::Element("node is detached".to_string()));
        }
        Ok(match name {
            "href" => self.href.clone(),
            "title" => self.title.clone(),
            _ => None,
        })
    }

    async fn inner_text(&self) -> Result<Option<String>> {
        if self.fail {
            return Err(BrowserError::Element("node is detached".to_string()));
        }
        Ok(self.text.clone())
    }
}
