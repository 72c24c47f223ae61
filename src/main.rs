use std::io::Write;
use std::path::PathBuf;
use anyhow::{Result, Context};
use fern::colors::{ColoredLevelConfig, Color};
use fern::Output;
use log::info;
use structopt::StructOpt;
use bpt_rust::core::common::{Float, RenderSettings, CheckpointPolicy, get_progress_bar};
use bpt_rust::core::sensor::{ImageSensor, ImageFileSink};
use bpt_rust::core::stats::{report_stats, print_stats};
use bpt_rust::integrators::bpt::BptIntegrator;
use bpt_rust::scenes::cornell::{CornellOptions, cornell_box};
use bpt_rust::init_stats;

#[derive(StructOpt, Debug)]
#[structopt(name = "bpt")]
struct Args {
    /// set LOG verbosity
    #[structopt(short, long)]
    verbose: bool,

    /// File that log messages are written to
    #[structopt(short, long, parse(from_os_str), default_value = "bpt.log")]
    logfile: PathBuf,

    /// Print all logging messages to stderr
    #[structopt(short = "e", long)]
    logtostderr: bool,

    /// Use specified number of threads for rendering
    #[structopt(short, long, default_value = "0")]
    nthreads: usize,

    /// Samples per pixel
    #[structopt(short, long, default_value = "16")]
    spp: u32,

    /// Seed of the top-level random number generator
    #[structopt(long, default_value = "591835103")]
    seed: u64,

    #[structopt(long, default_value = "512")]
    width: usize,

    #[structopt(long, default_value = "512")]
    height: usize,

    /// Edge length of square render tiles
    #[structopt(long, default_value = "16")]
    tile_size: usize,

    /// Scale applied to exported images
    #[structopt(short, long, default_value = "1.0")]
    brightness: Float,

    /// Also export after the last round when spp is not a power of two
    #[structopt(long)]
    export_final: Option<bool>,

    /// Directory checkpoint images are written to
    #[structopt(short, long, parse(from_os_str), default_value = ".")]
    outdir: PathBuf,

    /// Checkpoint image format: png, bmp, tga or pfm
    #[structopt(short, long, default_value = "bmp")]
    format: String,

    /// Built-in scene: cornell, cornell-empty or cornell-sky
    #[structopt(long, default_value = "cornell")]
    scene: String,

    /// Hide the progress bar
    #[structopt(short, long)]
    quiet: bool
}

fn setup_logging(verbose: bool, logfile: PathBuf, stderr: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow);
    let clevel = colors.info(Color::Green);

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let file_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(logfile)?);

    let stderr_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{color_line}[{level}] {message}\x1B[0m",
                color_line = format_args!("\x1B[{}m", colors.get_color(&record.level()).to_fg_str()),
                level = clevel.color(record.level()),
                message = message,
            ));
        })
        .level(level)
        .chain(
            Output::call(|record| {
                if let Some(pb) = get_progress_bar() {
                    pb.println(record.args().to_string());
                } else {
                    writeln!(std::io::stderr(), "{}", record.args()).ok();
                }
            })
        );

    let mut base_config = fern::Dispatch::new().level(level).chain(file_config);
    if stderr { base_config = base_config.chain(stderr_config); }
    base_config.apply()?;

    Ok(())
}

fn scene_options(name: &str) -> Result<CornellOptions> {
    let mut opts = CornellOptions::default();

    match name {
        "cornell" => {}
        "cornell-empty" => {
            opts.glass_sphere = false;
            opts.mirror_sphere = false;
        }
        "cornell-sky" => opts.sky = Some(0.5),
        _ => return Err(anyhow::anyhow!("Unknown scene \"{}\"", name))
    }

    Ok(opts)
}

fn main() -> Result<()> {
    let args: Args = Args::from_args();

    setup_logging(args.verbose, args.logfile.clone(), args.logtostderr)?;
    // Initialize statistics counter
    init_stats();

    let mut settings = RenderSettings {
        width: args.width,
        height: args.height,
        tile_width: args.tile_size,
        tile_height: args.tile_size,
        spp: args.spp,
        nthreads: args.nthreads,
        seed: args.seed,
        brightness: args.brightness,
        quiet: args.quiet,
        outdir: args.outdir.clone(),
        ..Default::default()
    };
    if let Some(export_final) = args.export_final {
        settings.checkpoint = CheckpointPolicy { export_final };
    }
    settings.validate()?;

    std::fs::create_dir_all(&settings.outdir)
        .with_context(|| format!("Unable to create output directory \"{}\"", settings.outdir.display()))?;

    let (scene, camera) = cornell_box(settings.width, settings.height, &scene_options(&args.scene)?);
    let sensor = ImageSensor::new(settings.width, settings.height, settings.thread_count());
    let sink = ImageFileSink::new(settings.outdir.clone(), &args.format);

    let integrator = BptIntegrator::new(settings);
    let rounds = integrator.render(&scene, &camera, &sensor, &sink)?;
    info!("Completed {} of {} sample rounds", rounds, integrator.settings().spp);

    report_stats();
    print_stats(std::io::stdout())?;

    Ok(())
}
