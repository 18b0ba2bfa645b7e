use std::io::{self, BufRead};
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::json;
use tracing::{debug, info_span};

use staffing_core::{AppState, CoverageRow, OfferRequest, hash_password};
use staffing_exchange::{ExchangeConfig, RemoteStore};
use staffing_ingest::{encode_users, to_csv};
use staffing_model::UserCredential;
use staffing_cli::summary::{
    coverage_table, occupancy_table, staff_table, status_counts, transfers_table,
};

use crate::cli::{
    AcceptArgs, Command, CoverageArgs, HashPasswordArgs, ListTransfersArgs, OccupancyArgs,
    OfferArgs, StaffArgs, TransferCommand,
};

pub type State = AppState<Box<dyn RemoteStore>>;

pub fn open_state(config_path: &Path) -> Result<State> {
    let config = ExchangeConfig::load(config_path)
        .with_context(|| format!("load configuration from {}", config_path.display()))?;
    let client = config.client();
    debug!(store = %client.store().location(), "using store");
    Ok(AppState::new(client))
}

pub fn run(state: &mut State, command: &Command) -> Result<()> {
    match command {
        Command::Coverage(args) => run_coverage(state, args),
        Command::Occupancy(args) => run_occupancy(state, args),
        Command::Staff(args) => run_staff(state, args),
        Command::Transfers(TransferCommand::List(args)) => run_list_transfers(state, args),
        Command::Transfers(TransferCommand::Offer(args)) => run_offer(state, args),
        Command::Transfers(TransferCommand::Accept(args)) => run_accept(state, args),
        Command::HashPassword(args) => run_hash_password(args),
    }
}

fn run_coverage(state: &mut State, args: &CoverageArgs) -> Result<()> {
    let snapshot = state.snapshot()?;
    let report = snapshot.coverage();
    let rows: Vec<&CoverageRow> = if args.current {
        report.for_current_shift(&snapshot.services)
    } else if let Some(shift) = args.shift {
        report.for_shift(shift).collect()
    } else {
        report.rows().iter().collect()
    };

    if args.json {
        let value = json!({
            "rows": rows,
            "total_required": rows.iter().map(|row| row.required).sum::<u32>(),
            "total_present": rows.iter().map(|row| row.present).sum::<u32>(),
            "uncounted": report.uncounted(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", coverage_table(rows.iter().copied()));
    println!("{}", status_counts(&report));
    let uncounted = report.uncounted();
    if !uncounted.is_empty() {
        println!();
        println!("Present staff not counted ({}):", uncounted.len());
        for member in uncounted {
            println!(
                "  {} {} / {} ({})",
                member.id,
                member.service,
                member.shift,
                member.reason.label()
            );
        }
    }
    Ok(())
}

fn run_occupancy(state: &mut State, args: &OccupancyArgs) -> Result<()> {
    let rows = state.snapshot()?.occupancy();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", occupancy_table(&rows));
    }
    Ok(())
}

fn run_staff(state: &mut State, args: &StaffArgs) -> Result<()> {
    let snapshot = state.snapshot()?;
    let table = match &args.service {
        Some(service) => {
            if !snapshot.services.iter().any(|known| known.matches(service)) {
                bail!("unknown service: {service}");
            }
            staff_table(snapshot.staff_in(service))
        }
        None => staff_table(&snapshot.staff),
    };
    println!("{table}");
    Ok(())
}

fn run_list_transfers(state: &mut State, args: &ListTransfersArgs) -> Result<()> {
    let snapshot = state.snapshot()?;
    let records = snapshot
        .transfers_newest_first()
        .into_iter()
        .filter(|record| !args.pending || record.is_pending());
    println!("{}", transfers_table(records));
    Ok(())
}

fn run_offer(state: &mut State, args: &OfferArgs) -> Result<()> {
    let span = info_span!("offer", staff = %args.staff_id);
    let _guard = span.enter();
    let mut request = OfferRequest::new(args.staff_id, &args.from, &args.to);
    if let Some(shift) = &args.to_shift {
        request = request.with_destination_shift(shift);
    }
    let record = state.offer(&request, &args.credential.credential)?;
    println!(
        "Transfer {} offered: staff {} from {} to {} ({})",
        record.id, record.staff_id, record.origin_service, record.destination_service, record.status
    );
    Ok(())
}

fn run_accept(state: &mut State, args: &AcceptArgs) -> Result<()> {
    let span = info_span!("accept", transfer = %args.transfer_id);
    let _guard = span.enter();
    let (record, member) = state.accept(args.transfer_id, &args.credential.credential)?;
    println!(
        "Transfer {} accepted: staff {} now in {} ({})",
        record.id,
        member.id,
        member.service,
        member.shift()
    );
    Ok(())
}

pub fn run_hash_password(args: &HashPasswordArgs) -> Result<()> {
    let service = args.service.trim();
    if service.is_empty() {
        bail!("service name must not be empty");
    }
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("empty password");
    }
    let user = UserCredential {
        service: service.to_string(),
        password_hash: hash_password(password),
    };
    print!("{}", users_row(&user)?);
    Ok(())
}

/// The `usuarios.csv` data line for one credential, without the header.
fn users_row(user: &UserCredential) -> Result<String> {
    let text = to_csv(&encode_users(std::slice::from_ref(user)))?;
    // The header is plain column names, so the first newline ends it.
    let (_, row) = text
        .split_once('\n')
        .context("users table serialized without a data row")?;
    Ok(row.to_string())
}
