// Macros
#[macro_use]
extern crate prettytable;

// Crates
use anyhow::{anyhow, Result};
use chrono::{Datelike, Local};
use clap::{crate_version, Arg, ArgAction, ArgMatches, Command};
use prettytable::{color, Attr, Cell, Row, Table};

// Local
use payday::client::RemoteClient;
use payday::config::Settings;
use payday::daily::{ProjectAction, ProjectSheet};
use payday::entry::format_amount;
use payday::reconcile::{in_clock, out_clock};
use payday::session;
use payday::storage::LocalStore;
use payday::telemetry;
use payday::totals::monthly_summary;
use payday::week::{accepts_time, Action, Field, Notice, WeekState};
use payday::{AmPm, Day};

fn cli() -> Command {
    Command::new("payday")
        .version(crate_version!())
        .about("Salary calculator for hourly work.")
        .arg(
            Arg::new("entry")
                .short('e')
                .long("entry")
                .value_name("day|in|out")
                .help("Set a day's clock times, e.g. \"Mon|9 AM|5.30 PM\". Empty times clear it.")
                .value_delimiter('|'),
        )
        .arg(
            Arg::new("rate")
                .short('r')
                .long("rate")
                .help("Set the hourly rate used for every day of the week."),
        )
        .arg(
            Arg::new("week")
                .short('w')
                .long("week")
                .action(ArgAction::SetTrue)
                .help("Print the week with hours, salary and totals."),
        )
        .arg(
            Arg::new("pull")
                .long("pull")
                .action(ArgAction::SetTrue)
                .help("Replace the local week with the one stored remotely."),
        )
        .arg(
            Arg::new("push")
                .long("push")
                .action(ArgAction::SetTrue)
                .help("Save the local week to the remote store."),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .action(ArgAction::SetTrue)
                .help("Delete every remote entry, then clear the local week."),
        )
        .arg(
            Arg::new("clear")
                .long("clear")
                .action(ArgAction::SetTrue)
                .help("Clear the local week only."),
        )
        .arg(
            Arg::new("daily")
                .short('d')
                .long("daily")
                .value_name("wage,hours")
                .action(ArgAction::Append)
                .help("Add a project to today's income. Repeat for more projects."),
        )
        .arg(
            Arg::new("monthly")
                .short('m')
                .long("monthly")
                .value_name("rate|days|hours")
                .help("Monthly salary from \"rate|working days|daily hours\".")
                .value_delimiter('|'),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;

    let subscriber = telemetry::get_subscriber("payday".into(), "warn".into(), std::io::stderr);
    telemetry::init_subscriber(subscriber)?;

    let matches = cli().get_matches();

    if let Some(values) = matches.get_many::<String>("daily") {
        match daily_income(values.map(String::as_str).collect()) {
            Ok(total) => println!("Today Total Income: {}", format_amount(total)),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if let Some(values) = matches.get_many::<String>("monthly") {
        let values: Vec<&str> = values.map(String::as_str).collect();
        if values.len() != 3 {
            eprintln!("Error: expected \"rate|days|hours\".");
            std::process::exit(1);
        }
        match monthly_summary(values[0], values[1], values[2]) {
            Ok(summary) => {
                println!("Monthly Salary: {}", format_amount(summary.total_salary));
                println!(
                    "{} days x {} @ {}/hr = {} hours",
                    summary.days,
                    summary.daily_hours_label(),
                    values[0],
                    format_amount(summary.total_hours)
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if !touches_week(&matches) {
        return Ok(());
    }

    let store = LocalStore::open(&settings.storage_path).await?;
    let client = RemoteClient::new(&settings.base_url);

    let mut state = report(session::load_local(WeekState::default(), &store).await);

    if matches.get_flag("pull") {
        state = report(session::pull(state, &client).await);
        state = persist(state, &store).await;
    }

    if let Some(rate) = matches.get_one::<String>("rate") {
        state = state.apply(Action::SetRate(rate.clone()));
        if &state.rate != rate {
            eprintln!("Error: rate must be a number with up to 3 digits and 2 decimals.");
            std::process::exit(1);
        }
        state = persist(state, &store).await;
    }

    if let Some(values) = matches.get_many::<String>("entry") {
        state = apply_entry(state, values.map(String::as_str).collect())?;
        state = persist(state, &store).await;
    }

    if matches.get_flag("push") {
        state = report(session::push(state, &client).await);
    }

    if matches.get_flag("reset") {
        let wiped = session::wipe(state, &client).await;
        let confirmed = matches!(wiped.notice, Some(Notice::Success(_)));
        state = report(wiped);
        if confirmed {
            state = errors_only(session::clear_local(state, &store).await);
        }
    }

    if matches.get_flag("clear") {
        state = report(session::clear_local(state, &store).await);
    }

    if matches.get_flag("week") {
        print_week(&state);
        report(state.apply(Action::Calculate));
    }

    Ok(())
}

fn touches_week(matches: &ArgMatches) -> bool {
    ["pull", "push", "reset", "clear", "week"]
        .iter()
        .any(|flag| matches.get_flag(flag))
        || matches.contains_id("rate")
        || matches.contains_id("entry")
}

/// Print and dismiss whatever the last transition wanted the user to see.
fn report(state: WeekState) -> WeekState {
    match &state.notice {
        Some(Notice::Success(message)) => println!("{}", message),
        Some(Notice::Error(message)) => eprintln!("Error: {}", message),
        None => {}
    }
    state.apply(Action::DismissNotice)
}

fn errors_only(state: WeekState) -> WeekState {
    if let Some(Notice::Error(message)) = &state.notice {
        eprintln!("Error: {}", message);
    }
    state.apply(Action::DismissNotice)
}

/// Save the working copy; only a failure is worth mentioning.
async fn persist(state: WeekState, store: &LocalStore) -> WeekState {
    errors_only(session::save_local(state, store).await)
}

fn apply_entry(state: WeekState, values: Vec<&str>) -> Result<WeekState> {
    if values.len() != 3 {
        return Err(anyhow!("Expected \"day|in|out\", got {} values", values.len()));
    }
    let day: Day = values[0].parse()?;
    let (in_time, in_am_pm) = in_clock(values[1]);
    let (out_time, out_am_pm) = out_clock(values[2]);
    for time in [&in_time, &out_time] {
        if !accepts_time(time) {
            return Err(anyhow!(
                "Invalid time {:?}: use hour[.minute] such as \"9\" or \"5.30\"",
                time
            ));
        }
    }

    Ok(state
        .apply(Action::SetAmPm {
            day,
            field: Field::In,
            am_pm: in_am_pm,
        })
        .apply(Action::SetAmPm {
            day,
            field: Field::Out,
            am_pm: out_am_pm,
        })
        .apply(Action::SetTime {
            day,
            field: Field::In,
            value: in_time,
        })
        .apply(Action::SetTime {
            day,
            field: Field::Out,
            value: out_time,
        }))
}

fn daily_income(values: Vec<&str>) -> Result<f64> {
    let mut sheet = ProjectSheet::new();
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            sheet = sheet.apply(ProjectAction::Add);
        }
        let (wage, hours) = value.split_once(',').unwrap_or((value, ""));
        let id = sheet
            .last_id()
            .ok_or_else(|| anyhow!("Project sheet has no rows"))?;
        sheet = sheet.apply(ProjectAction::Update {
            id,
            wage: Some(wage.trim().to_string()),
            hours: Some(hours.trim().to_string()),
        });
    }

    Ok(sheet.total()?)
}

fn print_week(state: &WeekState) {
    let today = Day::from(Local::now().weekday());

    let mut table = Table::new();
    table.add_row(row![Fb => "Day", "In", "Out", "Hours", "Salary"]);

    for day in Day::ALL.iter() {
        let entry = state.entry(*day);
        let text_color = if *day == today {
            color::CYAN
        } else if entry.is_leave {
            color::RED
        } else {
            color::WHITE
        };
        let clock = |time: &str, am_pm: AmPm| {
            if time.is_empty() {
                String::new()
            } else {
                format!("{} {}", time, am_pm)
            }
        };

        let cells = vec![
            day.name().to_string(),
            clock(&entry.in_time, entry.in_am_pm),
            clock(&entry.out_time, entry.out_am_pm),
            entry.hours.clone(),
            entry.salary.clone(),
        ];
        table.add_row(Row::new(
            cells
                .iter()
                .map(|c| Cell::new(c).with_style(Attr::ForegroundColor(text_color)))
                .collect(),
        ));
    }
    table.printstd();

    println!("Hourly Rate: {}/hr", state.rate);
    if let Some(summary) = state.clone().apply(Action::Calculate).summary {
        println!("Days Worked: {}", summary.days_worked);
        println!("Total Hours: {}", summary.total_hours_label());
        println!("Weekly Salary: {}", summary.total_salary_label());
    }
}
