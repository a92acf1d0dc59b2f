//! Logging into the `stud-app` portal and answering week queries through its AJAX endpoint.
use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use regex::Regex;
use reqwest::{
    header::{CONTENT_TYPE, COOKIE, REFERER, USER_AGENT},
    Client, RequestBuilder,
};
use serde::Serialize;

use super::{
    errors::{AuthenticationError, FetchError},
    models::{Config, Credentials},
    week_fetcher::WeekSource,
};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:132.0) Gecko/20100101 Firefox/132.0";
const LOGIN_ACTION: &str = "security.authentication.ImapLogin";
const BAD_PASSWORD_MARKER: &str = "bad-pasword-wiki";

/// Identifiers scraped from the pages served after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalTokens {
    pub jsessionid: String,
    pub person_id: String,
    pub round_number: String,
    pub semester_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekQueryParams<'a> {
    id_osoby: &'a str,
    id_semestru: &'a str,
    poczatek_tygodnia: i64,
}

#[derive(Serialize)]
struct WeekQuery<'a> {
    service: &'static str,
    method: &'static str,
    params: WeekQueryParams<'a>,
}

fn capture(pattern: &str, text: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().to_owned())
}

/// Returns `(jsessionid, person id, round number)` from the start page.
pub fn extract_login_tokens(
    start_page: &str,
) -> Result<(String, String, String), AuthenticationError> {
    let jsessionid = capture(r"jsessionid=([A-Z0-9]+)", start_page)
        .ok_or(AuthenticationError::MissingToken("jsessionid"))?;
    let person_id = capture(r"idosoby=([0-9]+)", start_page)
        .ok_or(AuthenticationError::MissingToken("idosoby"))?;
    let round_number = capture(r"nrtury=([0-9]+)", start_page)
        .ok_or(AuthenticationError::MissingToken("nrtury"))?;
    Ok((jsessionid, person_id, round_number))
}

pub fn extract_semester_id(schedule_page: &str) -> Result<String, AuthenticationError> {
    capture(r"idsemestru : (\d+),", schedule_page)
        .ok_or(AuthenticationError::MissingToken("idsemestru"))
}

/// Best effort, a failed write is only logged.
pub fn write_snapshot(dir: Option<&Path>, name: &str, contents: &str) {
    let Some(dir) = dir else {
        return;
    };
    let path = dir.join(name);
    match fs::write(&path, contents) {
        Ok(()) => debug!("Wrote snapshot {}", path.display()),
        Err(err) => warn!("Could not write snapshot {}: {}", path.display(), err),
    }
}

pub struct PortalSession {
    client: Client,
    base_url: String,
    origin: String,
    user_agent: String,
    cookies: String,
    tokens: PortalTokens,
    snapshot_dir: Option<PathBuf>,
}

/// `https://<domain>/<school>-stud-app/ledge/view`
pub fn base_url(config: &Config) -> String {
    format!(
        "https://{}/{}-stud-app/ledge/view",
        config.domain, config.school_code
    )
}

/// Referer of every request made from the schedule page.
pub fn schedule_referer(base_url: &str, person_id: &str, round_number: &str) -> String {
    format!(
        "{}/stud.schedule.SchedulePage?idosoby={}&nrtury={}",
        base_url, person_id, round_number
    )
}

fn browser_headers(builder: RequestBuilder, user_agent: &str, origin: &str) -> RequestBuilder {
    builder
        .header(USER_AGENT, user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.7,pl;q=0.3")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("Origin", origin)
        .header("DNT", "1")
}

impl PortalSession {
    pub async fn authenticate(
        client: Client,
        config: &Config,
        credentials: &Credentials,
    ) -> Result<PortalSession, AuthenticationError> {
        if credentials.login.is_empty() || credentials.password.is_empty() {
            return Err(AuthenticationError::BadCredentials);
        }

        let base_url = base_url(config);
        let origin = format!("https://{}/", config.domain);
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());
        let snapshot_dir = config.snapshot_dir.clone();
        let login_form = [
            ("login", credentials.login.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let start_page_url = format!("{}/stud.StartPage", base_url);
        let locale_cookie = format!("locale.{}=en_US", credentials.login);

        info!("Logging into {} as {}", config.domain, credentials.login);
        let start_page = browser_headers(client.post(&start_page_url), &user_agent, &origin)
            .query(&[("action", LOGIN_ACTION)])
            .header(REFERER, &start_page_url)
            .header(COOKIE, &locale_cookie)
            .form(&login_form)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        write_snapshot(snapshot_dir.as_deref(), "website-main.html", &start_page);
        if start_page.contains(BAD_PASSWORD_MARKER) {
            return Err(AuthenticationError::BadCredentials);
        }

        let (jsessionid, person_id, round_number) = extract_login_tokens(&start_page)?;
        debug!("Person {} in round {}", person_id, round_number);
        let cookies = format!("{}; JSESSIONID={}", locale_cookie, jsessionid);

        let schedule_page = browser_headers(
            client.post(format!("{}/stud.schedule.SchedulePage", base_url)),
            &user_agent,
            &origin,
        )
        .query(&[
            ("action", LOGIN_ACTION),
            ("idosoby", person_id.as_str()),
            ("nrtury", round_number.as_str()),
        ])
        .header(
            REFERER,
            schedule_referer(&base_url, &person_id, &round_number),
        )
        .header(COOKIE, &cookies)
        .form(&login_form)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
        write_snapshot(
            snapshot_dir.as_deref(),
            "website-timetable.html",
            &schedule_page,
        );
        let semester_id = extract_semester_id(&schedule_page)?;
        info!("Authentication successful, semester {}", semester_id);

        Ok(PortalSession {
            client,
            base_url,
            origin,
            user_agent,
            cookies,
            tokens: PortalTokens {
                jsessionid,
                person_id,
                round_number,
                semester_id,
            },
            snapshot_dir,
        })
    }

    pub fn tokens(&self) -> &PortalTokens {
        &self.tokens
    }
}

impl WeekSource for PortalSession {
    async fn fetch_week(&self, week_start_ms: i64) -> Result<String, FetchError> {
        let query = WeekQuery {
            service: "Planowanie",
            method: "getUlozoneTerminyOsoby",
            params: WeekQueryParams {
                id_osoby: &self.tokens.person_id,
                id_semestru: &self.tokens.semester_id,
                poczatek_tygodnia: week_start_ms,
            },
        };
        let body = serde_json::to_string(&query)?;

        let response = browser_headers(
            self.client.post(format!("{}/AJAX", self.base_url)),
            &self.user_agent,
            &self.origin,
        )
        .query(&[
            ("action", LOGIN_ACTION),
            ("idosoby", self.tokens.person_id.as_str()),
            ("nrtury", self.tokens.round_number.as_str()),
        ])
        .header(
            REFERER,
            schedule_referer(
                &self.base_url,
                &self.tokens.person_id,
                &self.tokens.round_number,
            ),
        )
        .header(COOKIE, &self.cookies)
        .header("X-Requested-With", "XMLHttpRequest")
        .header("Pragma", "no-cache")
        .header("Cache-Control", "no-cache")
        .body(body)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
        write_snapshot(self.snapshot_dir.as_deref(), "timetable.json", &response);
        Ok(response)
    }
}

#[cfg(test)]
#[path = "tests/portal_session.rs"]
mod tests;
