use std::io;
use std::process::ExitCode;

use clap::Parser;
use perforation_toolbox::app::{self, App, AppError, Cli};
use perforation_toolbox::i18n::{self, keys, Translator};
use perforation_toolbox::logging;

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 계산과 보고서 출력을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let app = match App::from_cli(&cli) {
        Ok(app) => app,
        Err(err) => {
            let tr = Translator::new(i18n::resolve_language(cli.lang.as_deref(), None));
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match app.execute(&cli, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(class) => ExitCode::from(app::exit_code_for(class)),
        Err(err) => {
            let tr = app.translator();
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            if matches!(err, AppError::Sizing(_)) {
                eprintln!("{}", tr.t(keys::REPORT_WITHHELD));
            }
            ExitCode::FAILURE
        }
    }
}
