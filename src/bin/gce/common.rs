use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use gce_provision::gcp::gce::{ComputeClient, ProgressCallback, ProgressEvent};
use gce_provision::settings::Settings;

pub fn compute_client(settings: &Settings) -> ComputeClient {
    ComputeClient::with_base_url(settings.token_source(), &settings.api_base)
}

/// A stderr spinner plus the callback that keeps it current.
pub fn operation_spinner() -> Result<(ProgressBar, ProgressCallback)> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed_precise}]")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let spinner = pb.clone();
    let callback: ProgressCallback = Box::new(move |event| match event {
        ProgressEvent::Started { operation } => {
            spinner.set_message(format!("Waiting for operation {}", operation));
        }
        ProgressEvent::Polling {
            operation,
            status,
            progress,
            ..
        } => match progress {
            Some(p) => spinner.set_message(format!("Operation {}: {} ({}%)", operation, status, p)),
            None => spinner.set_message(format!("Operation {}: {}", operation, status)),
        },
        ProgressEvent::Completed { operation, .. } => {
            spinner.finish_with_message(format!("Operation {}: done.", operation));
        }
        ProgressEvent::Failed { operation, error } => {
            spinner.finish_with_message(format!("Operation {} failed: {}", operation, error));
        }
    });
    Ok((pb, callback))
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    print_row(headers.iter().copied(), &widths);
    print_row(widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in rows {
        print_row(row.iter().map(String::as_str), &widths);
    }
}

fn print_row<S: AsRef<str>>(cells: impl Iterator<Item = S>, widths: &[usize]) {
    for (i, cell) in cells.enumerate() {
        if i > 0 {
            print!("  ");
        }
        print!("{:width$}", cell.as_ref(), width = widths[i]);
    }
    println!();
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
