//! `CalendarGateway` backed by the Google Calendar v3 REST API.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use calmirror_core::{CalMirrorError, CalMirrorResult, CalendarEvent, CalendarGateway, CalendarRef};
use chrono::{SecondsFormat, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::app_config::ProviderPaths;
use crate::google_event::wire::{CalendarList, EventList, GoogleEvent};
use crate::google_event::{FromGoogle, ToGoogle};
use crate::session::Session;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const PAGE_SIZE: &str = "1000";

pub struct GoogleGateway {
    account: String,
    paths: ProviderPaths,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

impl GoogleGateway {
    pub fn new(account: impl Into<String>, paths: ProviderPaths) -> Self {
        GoogleGateway {
            account: account.into(),
            paths,
            http: reqwest::Client::new(),
            session: Mutex::new(None),
        }
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    /// Current access token, loading or refreshing the session first.
    async fn bearer(&self) -> Result<String> {
        let mut guard = self.session.lock().await;

        match guard.as_mut() {
            Some(session) => session.ensure_valid().await?,
            None => *guard = Some(Session::load_valid(&self.paths, &self.account).await?),
        }

        let session = guard
            .as_ref()
            .ok_or_else(|| anyhow!("Google session for {} was not loaded", self.account))?;
        Ok(session.access_token().to_string())
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(API_BASE)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid API base URL"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.bearer().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn find_calendar(&self, name: &str) -> Result<Option<CalendarRef>> {
        let url = self.url(&["users", "me", "calendarList"])?;
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self.request(Method::GET, url.clone()).await?;
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let page: CalendarList = check(req.send().await?)
                .await
                .context("Failed to fetch calendar list")?
                .json()
                .await?;

            if let Some(entry) = page.items.into_iter().find(|c| c.summary == name) {
                return Ok(Some(CalendarRef {
                    id: entry.id,
                    name: entry.summary,
                }));
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => return Ok(None),
            }
        }
    }

    async fn fetch_future_events(&self, calendar: &CalendarRef) -> Result<Vec<CalendarEvent>> {
        let url = self.url(&["calendars", &calendar.id, "events"])?;
        let time_min = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut page_token: Option<String> = None;
        let mut events = Vec::new();

        loop {
            let mut req = self.request(Method::GET, url.clone()).await?.query(&[
                ("timeMin", time_min.as_str()),
                ("maxResults", PAGE_SIZE),
                ("showHiddenInvitations", "true"),
            ]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }

            let page: EventList = check(req.send().await?)
                .await
                .with_context(|| format!("Failed to fetch events of {}", calendar.name))?
                .json()
                .await?;

            for item in page.items {
                let id = item.id.clone().unwrap_or_default();
                match CalendarEvent::from_google(item) {
                    Ok(event) => events.push(event),
                    Err(e) => warn!(calendar = %calendar.name, event_id = %id, "Skipping event: {e:#}"),
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(calendar = %calendar.name, count = events.len(), "Listed future events");
        Ok(events)
    }

    async fn insert(&self, calendar: &CalendarRef, event: &CalendarEvent) -> Result<String> {
        let url = self.url(&["calendars", &calendar.id, "events"])?;

        let created: GoogleEvent = check(
            self.request(Method::POST, url)
                .await?
                .query(&[("sendUpdates", "none")])
                .json(&event.to_google())
                .send()
                .await?,
        )
        .await
        .with_context(|| format!("Failed to create event '{}'", event.summary))?
        .json()
        .await?;

        created
            .id
            .ok_or_else(|| anyhow!("Google returned no id for '{}'", event.summary))
    }

    async fn replace(&self, calendar: &CalendarRef, event: &CalendarEvent) -> Result<()> {
        let id = event_id(event)?;
        let url = self.url(&["calendars", &calendar.id, "events", id])?;

        check(
            self.request(Method::PUT, url)
                .await?
                .query(&[("sendUpdates", "none")])
                .json(&event.to_google())
                .send()
                .await?,
        )
        .await
        .with_context(|| format!("Failed to update event '{}'", event.summary))?;

        Ok(())
    }

    async fn remove(&self, calendar: &CalendarRef, event: &CalendarEvent) -> Result<()> {
        let id = event_id(event)?;
        let url = self.url(&["calendars", &calendar.id, "events", id])?;

        let response = self
            .request(Method::DELETE, url)
            .await?
            .query(&[("sendUpdates", "none")])
            .send()
            .await?;

        // Already gone counts as deleted
        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            debug!(event_id = %id, "Event already deleted");
            return Ok(());
        }

        check(response)
            .await
            .with_context(|| format!("Failed to delete event '{}'", event.summary))?;
        Ok(())
    }
}

#[async_trait]
impl CalendarGateway for GoogleGateway {
    async fn resolve_calendar(&self, name: &str) -> CalMirrorResult<CalendarRef> {
        self.find_calendar(name)
            .await
            .map_err(remote)?
            .ok_or_else(|| CalMirrorError::CalendarNotFound(name.to_string()))
    }

    async fn list_future_events(
        &self,
        calendar: &CalendarRef,
    ) -> CalMirrorResult<Vec<CalendarEvent>> {
        self.fetch_future_events(calendar).await.map_err(remote)
    }

    async fn create_event(
        &self,
        calendar: &CalendarRef,
        event: &CalendarEvent,
    ) -> CalMirrorResult<String> {
        self.insert(calendar, event).await.map_err(remote)
    }

    async fn update_event(
        &self,
        calendar: &CalendarRef,
        event: &CalendarEvent,
    ) -> CalMirrorResult<()> {
        self.replace(calendar, event).await.map_err(remote)
    }

    async fn delete_event(
        &self,
        calendar: &CalendarRef,
        event: &CalendarEvent,
    ) -> CalMirrorResult<()> {
        self.remove(calendar, event).await.map_err(remote)
    }
}

fn event_id(event: &CalendarEvent) -> Result<&str> {
    match event.id.as_deref() {
        Some(id) if !id.is_empty() => Ok(id),
        _ => bail!("Event '{}' has no remote id", event.summary),
    }
}

/// Turn a non-success response into an error carrying the status and body.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    bail!("Google API returned {status}: {body}")
}

fn remote(err: anyhow::Error) -> CalMirrorError {
    CalMirrorError::Remote(format!("{err:#}"))
}
