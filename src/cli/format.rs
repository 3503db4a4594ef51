//! Format output dispatch helpers

/// Dispatch on the output format when the JSON branch returns a `Result`
/// and the human and records branches print directly.
///
/// ```rust,ignore
/// output_by_format_result!(cli.format,
///     json => { print_json_status("ok", None, &[("summary", json!(summary))]) },
///     human => { println!("Recomputed"); },
///     records => { print_records_header("recompute", &[]); }
/// )?;
/// ```
#[macro_export]
macro_rules! output_by_format_result {
    ($format:expr, json => $json:expr, human => $human:block, records => $records:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
            $crate::cli::OutputFormat::Records => {
                $records;
                Ok(())
            }
        }
    };
}
