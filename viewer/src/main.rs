use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eniac_panel::prelude::*;
use eniac_panel::settings::{DEFAULT_BASE_URL, DEFAULT_FPS};
use tokio::io::{AsyncBufReadExt, BufReader};

mod input;
use input::Input;

#[derive(Debug, Parser)]
#[command(
    name = "panel-viewer",
    about = "Headless ENIAC front panel driven from stdin"
)]
struct Args {
    /// Base URL of the simulator
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Indicator sweeps per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f32,

    /// Read the panel documents from this directory instead of the simulator
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Command request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

impl Args {
    fn settings(&self) -> PanelSettings {
        PanelSettings {
            base_url: self.url.clone(),
            fps: self.fps,
            request_timeout: Duration::from_secs(self.timeout),
            ..PanelSettings::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logger();
    let args = Args::parse();
    let settings = args.settings();

    let source: Box<dyn DocumentSource> = match &args.config_dir {
        Some(dir) => Box::new(DirectorySource::new(dir)),
        None => Box::new(HttpDocumentSource::from_settings(&settings)?),
    };

    let surface = Arc::new(MemorySurface::lenient());
    let runtime =
        PanelRuntime::start(&settings, surface.clone(), source.as_ref())
            .await?;
    info!("Panel ready. Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match input::parse(&line) {
            Ok(Some(Input::Quit)) => break,
            Ok(Some(command)) => run(runtime.panel(), &surface, command),
            Ok(None) => {}
            Err(err) => eprintln!("{}", err),
        }
    }

    Ok(())
}

fn run(panel: &Panel, surface: &MemorySurface, command: Input) {
    match command {
        Input::Pointer { event, path } => {
            let path: Vec<&str> = path.iter().map(String::as_str).collect();
            if panel.dispatch(&path, event) == Propagation::Continue {
                println!("(nothing handled {:?})", event);
            }
        }
        Input::Angle(degrees) => {
            let calibration = &panel.context().calibration;
            match calibration.adjust(degrees) {
                Some(selector) => println!("{} at {}", selector, degrees),
                None => println!("no switch has moved yet"),
            }
        }
        Input::Show(selector) => match surface.state(&selector) {
            Some(state) => println!("{}: {:?}", selector, state),
            None => println!("{}: unknown", selector),
        },
        Input::Lit => {
            for selector in panel.lit() {
                println!("{}", selector);
            }
        }
        Input::Help => println!("{}", input::HELP),
        Input::Quit => {}
    }
}
