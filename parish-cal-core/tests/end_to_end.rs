// Full pipeline against a mock council website.
use chrono::NaiveDate;
use mockito::Server;
use parish_cal_core::fetch::HttpFetcher;
use parish_cal_core::ics::{CalendarDocument, generate_ics};
use parish_cal_core::{FetchError, MeetingSource, ScraperConfig, collect_events};

const FULL_COUNCIL_PAGE: &str = r#"
<html><body>
  <h2>Full Council</h2>
  <div class="minutes">
    <h4>6 Jan 25</h4>
    <p>19:00 to 21:00</p>
    <a href="/docs/fc-agenda-jan.pdf">Agenda</a>
    <a href="/docs/fc-minutes-jan.pdf">Minutes</a>
  </div>
</body></html>
"#;

const PLANNING_PAGE: &str = r#"
<html><body>
  <h2>Planning</h2>
  <div class="minutes">
    <h4>Next meeting</h4>
    <p>To be arranged</p>
  </div>
  <div class="minutes">
    <h4>20 Jan 25</h4>
    <p>18:30</p>
    <a href="/docs/planning-agenda-jan.pdf">Agenda - January</a>
    <a href="https://files.example.net/planning-minutes-dec.pdf">Minutes of last meeting</a>
  </div>
</body></html>
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
}

fn config_for(server_url: &str) -> ScraperConfig {
    ScraperConfig {
        base_url: server_url.to_string(),
        sources: vec![
            MeetingSource::new("Full Council", &format!("{server_url}/Full_Council.aspx")),
            MeetingSource::new("Planning", &format!("{server_url}/Planning.aspx")),
        ],
        ..ScraperConfig::default()
    }
}

#[tokio::test]
async fn test_only_future_meeting_is_written_with_resolved_links() {
    let mut server = Server::new_async().await;
    let council = server
        .mock("GET", "/Full_Council.aspx")
        .with_status(200)
        .with_body(FULL_COUNCIL_PAGE)
        .create_async()
        .await;
    let planning = server
        .mock("GET", "/Planning.aspx")
        .with_status(200)
        .with_body(PLANNING_PAGE)
        .create_async()
        .await;

    let url = server.url();
    let config = config_for(&url);
    let fetcher = HttpFetcher::new(config.request_timeout).unwrap();

    let report = collect_events(&fetcher, &config, today()).await;
    council.assert_async().await;
    planning.assert_async().await;

    assert_eq!(report.outcomes[0].result, Ok(0));
    assert_eq!(report.outcomes[1].result, Ok(1));

    let ics = generate_ics(&CalendarDocument::new(&config, today(), report.events)).unwrap();

    assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1, "ICS:\n{ics}");
    assert!(ics.contains("SUMMARY:St Mewan Parish - Planning Meeting"));
    assert!(!ics.contains("Full Council"));
    assert!(ics.contains("DTSTART;TZID=Europe/London:20250120T183000"));
    assert!(ics.contains("DTEND;TZID=Europe/London:20250120T193000"));
    assert!(ics.contains(&format!(
        "Agenda: {url}/docs/planning-agenda-jan.pdf"
    )));
    assert!(ics.contains("Minutes: https://files.example.net/planning-minutes-dec.pdf"));
    assert!(ics.starts_with("BEGIN:VCALENDAR\nVERSION:2.0\n"));
    assert!(ics.ends_with("END:VCALENDAR\n"));
}

#[tokio::test]
async fn test_failed_source_is_reported_and_others_still_collected() {
    let mut server = Server::new_async().await;
    let _council = server
        .mock("GET", "/Full_Council.aspx")
        .with_status(500)
        .create_async()
        .await;
    let _planning = server
        .mock("GET", "/Planning.aspx")
        .with_status(200)
        .with_body(PLANNING_PAGE)
        .create_async()
        .await;

    let config = config_for(&server.url());
    let fetcher = HttpFetcher::new(config.request_timeout).unwrap();

    let report = collect_events(&fetcher, &config, today()).await;

    assert_eq!(report.failed_sources(), vec!["Full Council"]);
    assert_eq!(report.outcomes[0].result, Err(FetchError::Status(500)));
    assert_eq!(report.events.len(), 1);
}

#[tokio::test]
async fn test_same_inputs_same_day_give_identical_output() {
    let mut server = Server::new_async().await;
    let _planning = server
        .mock("GET", "/Planning.aspx")
        .with_status(200)
        .with_body(PLANNING_PAGE)
        .expect(2)
        .create_async()
        .await;

    let url = server.url();
    let config = ScraperConfig {
        base_url: url.clone(),
        sources: vec![MeetingSource::new("Planning", &format!("{url}/Planning.aspx"))],
        ..ScraperConfig::default()
    };
    let fetcher = HttpFetcher::new(config.request_timeout).unwrap();

    let first = collect_events(&fetcher, &config, today()).await;
    let second = collect_events(&fetcher, &config, today()).await;

    let first = generate_ics(&CalendarDocument::new(&config, today(), first.events)).unwrap();
    let second = generate_ics(&CalendarDocument::new(&config, today(), second.events)).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_running_after_the_meeting_drops_it() {
    let mut server = Server::new_async().await;
    let _planning = server
        .mock("GET", "/Planning.aspx")
        .with_status(200)
        .with_body(PLANNING_PAGE)
        .create_async()
        .await;

    let url = server.url();
    let config = ScraperConfig {
        base_url: url.clone(),
        sources: vec![MeetingSource::new("Planning", &format!("{url}/Planning.aspx"))],
        ..ScraperConfig::default()
    };
    let fetcher = HttpFetcher::new(config.request_timeout).unwrap();

    let later = NaiveDate::from_ymd_opt(2025, 1, 21).unwrap();
    let report = collect_events(&fetcher, &config, later).await;

    assert!(report.is_empty());
    assert!(report.failed_sources().is_empty());
}
