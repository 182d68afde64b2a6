use anyhow::{Result, bail};
use lotto_event::types::{ErrorCode, ParticipateRequest, ResultCheckRequest, ResultOutcome};
use lotto_event::utils::mask_phone;
use lotto_event::{
    ApiError, HttpTransport, LottoApi, SqliteStore, SystemClock, VisitTracker, config,
};
use std::env;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lotto-event <status | participate <phone> | result <phone>>";

enum Command {
    Status,
    Participate(String),
    Result(String),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["status"] | [] => Ok(Command::Status),
        ["participate", phone] => Ok(Command::Participate(phone.to_string())),
        ["result", phone] => Ok(Command::Result(phone.to_string())),
        _ => bail!(USAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let store = SqliteStore::open(&config.storage_path)?;
    let tracker = VisitTracker::new(store, SystemClock);
    if tracker.check_and_update_first_visit()? {
        println!("🎉 Welcome! Today's lotto event is waiting for you.");
    }

    let transport = HttpTransport::new(config.api_base_url.clone(), config.request_timeout)?;
    let api = LottoApi::new(transport);
    tracing::info!(base_url = %config.api_base_url, "lotto event client ready");

    let outcome = match &command {
        Command::Status => status(&api).await,
        Command::Participate(phone) => participate(&api, phone).await,
        Command::Result(phone) => result(&api, phone).await,
    };

    if let Err(err) = &outcome {
        if let Some(hint) = err.downcast_ref::<ApiError>().and_then(hint_for) {
            println!("💡 {}", hint);
        }
    }
    outcome
}

fn hint_for(err: &ApiError) -> Option<&'static str> {
    match ErrorCode::parse(err.code()?)? {
        ErrorCode::InvalidRequest => Some("Check the phone number format and try again."),
        ErrorCode::EventNotActive => Some("The event is not running right now."),
        ErrorCode::AnnounceNotActive => Some("Results are not announced yet."),
        ErrorCode::DuplicateParticipation => Some("This phone number has already joined the event."),
        ErrorCode::CapacityFull => Some("All lotto numbers have been handed out."),
        ErrorCode::NotFound => Some("No participation was found for this phone number."),
        ErrorCode::InternalError => Some("The lotto server had a problem, please retry later."),
    }
}

async fn status(api: &LottoApi<HttpTransport>) -> Result<()> {
    let event_open = api.check_event_active().await?;
    let announce_open = api.check_announce_active().await?;

    println!("📅 Event period:        {}", if event_open { "open" } else { "closed" });
    println!("📣 Announcement period: {}", if announce_open { "open" } else { "closed" });
    Ok(())
}

async fn participate(api: &LottoApi<HttpTransport>, phone: &str) -> Result<()> {
    if !api.check_event_active().await? {
        println!("⏳ The event is not running right now.");
        return Ok(());
    }

    tracing::info!(phone = %mask_phone(phone), "participating");
    let response = api
        .participate(&ParticipateRequest {
            phone: phone.to_string(),
        })
        .await?;

    println!("🎟️ Participant #{}", response.participant_id);
    println!("   Your lotto number: {}", response.lotto_number);
    Ok(())
}

async fn result(api: &LottoApi<HttpTransport>, phone: &str) -> Result<()> {
    if !api.check_announce_active().await? {
        println!("⏳ Results are not announced yet.");
        return Ok(());
    }

    tracing::info!(phone = %mask_phone(phone), "checking result");
    let response = api
        .check_result(&ResultCheckRequest {
            phone: phone.to_string(),
        })
        .await?;

    if let Some(number) = &response.lotto_number {
        println!("🎟️ Lotto number: {}", number);
    }
    match response.outcome() {
        ResultOutcome::Ranked(rank) => println!("🏆 Congratulations, rank {}!", rank),
        ResultOutcome::Won => match response.amount {
            Some(amount) => println!("🏆 You won {} KRW!", amount),
            None => println!("🏆 You won!"),
        },
        ResultOutcome::Lost => println!("🙁 Not a winner this time."),
    }
    if let Some(count) = response.check_count {
        println!("   Checked {} time(s)", count);
    }
    Ok(())
}
