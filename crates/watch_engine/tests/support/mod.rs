#![allow(dead_code)]

use std::sync::Mutex;

use watch_engine::{NotificationPlatform, PermissionState};

pub const ORIGIN: &str = "https://divar.ir";

/// One listing card in the markup layout of the source site.
pub fn card(token: &str, title: &str, deposit: &str, rent: &str) -> String {
    format!(
        r#"<div class="post-list__widget-col-c1444">
  <a href="/v/{slug}/{token}">
    <article class="kt-post-card" token="{token}">
      <div class="kt-post-card__info">
        <h2 class="kt-post-card__title">{title}</h2>
        <div class="kt-post-card__description">{deposit}</div>
        <div class="kt-post-card__description">{rent}</div>
      </div>
      <div class="kt-post-card-thumbnail"><img data-src="https://s100.divarcdn.com/{token}.jpg" src="placeholder.svg"></div>
    </article>
  </a>
</div>"#,
        slug = title.replace(' ', "-"),
    )
}

pub fn page(cards: &[String]) -> String {
    format!(
        "<html><head><title>results</title></head><body><main>{}</main></body></html>",
        cards.join("\n")
    )
}

/// Notification platform that records alerts instead of showing them.
pub struct RecordingPlatform {
    state: Mutex<PermissionState>,
    answer: PermissionState,
    requests: Mutex<usize>,
    shown: Mutex<Vec<(String, String)>>,
}

impl RecordingPlatform {
    pub fn new(state: PermissionState, answer: PermissionState) -> Self {
        Self {
            state: Mutex::new(state),
            answer,
            requests: Mutex::new(0),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::new(PermissionState::Granted, PermissionState::Granted)
    }

    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn requests(&self) -> usize {
        *self.requests.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl NotificationPlatform for RecordingPlatform {
    fn permission_state(&self) -> PermissionState {
        *self.state.lock().unwrap()
    }

    async fn request_permission(&self) -> PermissionState {
        *self.requests.lock().unwrap() += 1;
        *self.state.lock().unwrap() = self.answer;
        self.answer
    }

    fn show(&self, title: &str, body: &str) {
        self.shown
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}
