// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! tollgate command line entry point.

use tollgate_bin::{
    cli::Cli,
    commands,
    error::report_error_and_exit,
    logging::init_logging,
};

fn main() {
    let cli = Cli::parse_args();
    init_logging(cli.effective_log_level(), cli.log_format);

    if let Err(err) = commands::execute(&cli) {
        report_error_and_exit(err);
    }
}
