//! Personal access code.

use parkwatch_core::format::format_custom_date_time;
use parkwatch_core::{Monitor, QrCode};

use crate::cli::{GlobalOpts, QrArgs};
use crate::error::CliError;
use crate::output;

fn valid_until(qr: &QrCode) -> String {
    qr.expires_at
        .as_deref()
        .map_or_else(|| "—".to_owned(), format_custom_date_time)
}

pub async fn handle(monitor: &Monitor, args: QrArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let qr = monitor
        .generate_qr()
        .await
        .map_err(|e| CliError::from_core(e, global.timeout))?;

    if let Some(path) = args.out {
        let data_url = qr.qr_code_data_url.as_deref().ok_or_else(|| CliError::Api {
            message: "server returned no access code".into(),
        })?;
        std::fs::write(&path, data_url)?;
        if !global.quiet {
            eprintln!(
                "Access code written to {} (valid until {})",
                path.display(),
                valid_until(&qr)
            );
        }
        return Ok(());
    }

    let out = output::render_single(
        &global.output,
        &qr,
        |q| {
            format!(
                "QR code is valid until {}\n{}",
                valid_until(q),
                q.qr_code_data_url.as_deref().unwrap_or("(no code)")
            )
        },
        |q| q.qr_code_data_url.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
