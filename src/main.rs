use anyhow::{Context, Result};
use clap::Parser;
use distview::cli::{Cli, OutputFormat};
use distview::config::ViewerConfig;
use distview::csv_output::{CsvHistogramOutput, CsvOutput};
use distview::json_output::JsonOutput;
use distview::report::{ReportSink, TextReport};
use distview::sample_store::Group;
use distview::stats::SampleSummary;
use distview::viewer::DistributionViewer;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Config file (or defaults) with command-line overrides applied
fn resolve_config(args: &Cli) -> Result<ViewerConfig> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };

    if let Some(pattern) = &args.model {
        config.model_pattern = pattern.clone();
    }
    if let Some(pattern) = &args.data {
        config.data_pattern = pattern.clone();
    }
    if let Some(delay_type) = args.delay_type {
        config.delay_type = usize::from(delay_type);
    }
    if let Some(rate) = args.rate {
        config.sample_rate = rate;
    }
    if let Some(resolution) = args.resolution {
        config.classifier.resolution = resolution;
    }
    if let Some(domain) = args.domain {
        config.domain_bound = domain;
    }
    if args.clip {
        config.clip_percentile = true;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }

    Ok(config)
}

fn sink_for(format: OutputFormat) -> Box<dyn ReportSink> {
    match format {
        OutputFormat::Text => Box::new(TextReport::new()),
        OutputFormat::Json => Box::new(JsonOutput::new()),
        OutputFormat::Csv => Box::new(CsvOutput::new()),
    }
}

/// Feed every loaded set and every load failure into the report
fn report_sets(viewer: &DistributionViewer, sink: &mut dyn ReportSink) -> Result<()> {
    for group in [Group::Model, Group::Data] {
        let store = viewer.store(group);

        for (index, set) in store.sets().iter().enumerate() {
            let summary = SampleSummary::from_samples(set.samples())
                .with_context(|| format!("Failed to summarize {}", set.source().display()))?;
            sink.add_set(group, index, set.source(), summary.as_ref());
        }

        for failure in store.failures() {
            eprintln!("distview: warning: {}", failure.error);
            sink.add_failure(group, failure);
        }
    }
    Ok(())
}

fn run(args: &Cli) -> Result<()> {
    let config = resolve_config(args)?;
    let mut viewer = DistributionViewer::new(config)?;
    viewer.load()?;

    let mut sink = sink_for(args.format);
    report_sets(&viewer, sink.as_mut())?;

    let model_sets = viewer.store(Group::Model).sets().len();
    let data_sets = viewer.store(Group::Data).sets().len();
    if model_sets == 0 && data_sets == 0 {
        anyhow::bail!(
            "No sample sets loaded (model: '{}', data: '{}')",
            viewer.config().model_pattern,
            viewer.config().data_pattern
        );
    }

    let snapshot = viewer
        .refresh_histograms()
        .context("Failed to bin histograms")?;

    if let Some(path) = &args.histogram_csv {
        std::fs::write(path, CsvHistogramOutput::new(&snapshot).to_csv())
            .with_context(|| format!("Failed to write histogram CSV: {}", path.display()))?;
    }

    if !args.no_match {
        viewer.start_match();
        while let Some(matched) = viewer.match_next_group() {
            match &matched.outcome {
                Ok(result) => sink.publish(matched.group, &matched.source, result),
                Err(e) => sink.reject(matched.group, &matched.source, e),
            }
        }
    }

    let output = sink.render()?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    run(&args)
}
