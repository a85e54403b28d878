//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::app::{AppContainer, DefaultAppContainer, SmartCutPlan, SmartCutRequest};
use crate::cli::args::{EncoderArgsArgs, EncodersArgs, KeyframesArgs, PlanArgs};
use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::model::{Keyframe, TimeSpec};
use crate::domain::rules::{
    EncoderFamily, EncoderQualityMapper, QualityDialect, QualityOverridePolicy,
};
use crate::error::SmartCutResult;
use crate::utils::init_logging;

/// Flags shared by every subcommand; these win over config file and environment
#[derive(Debug, Default)]
pub struct GlobalOverrides {
    pub config: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_json: bool,
}

/// Load configuration, apply CLI overrides and install logging
fn prepare(overrides: &GlobalOverrides) -> Result<AppConfig> {
    let mut config =
        AppConfig::load(overrides.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = &overrides.log_level {
        config.logging.level = level.clone();
    }
    if overrides.log_json {
        config.logging.json = true;
    }
    config.validate()?;

    init_logging(config.log_level()?, config.logging.json)?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> SmartCutResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Execute the plan command
pub async fn plan(overrides: &GlobalOverrides, args: PlanArgs) -> Result<()> {
    let config = prepare(overrides)?;
    let cut_from = TimeSpec::parse(&args.at)?;

    info!("Planning cut of {} at {}", args.input, cut_from);

    let mut request = SmartCutRequest::new(args.input, cut_from.seconds);
    request.video_stream_index = args.stream;
    request.output_index = args.output_index;
    if let Some(encoder) = args.encoder.or(config.encoding.encoder.clone()) {
        request = request.with_encoder(encoder);
    }
    if let Some(quality) = args.quality {
        request = request.with_quality(quality);
    }
    if let Some(preset) = args.preset {
        request = request.with_preset(preset);
    }

    let container = DefaultAppContainer::new(&config)?;
    let plan = container.smart_cut_interactor().plan(request).await?;

    if args.json {
        print_json(&plan)?;
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &SmartCutPlan) {
    println!("Input:         {}", plan.input_path);
    if let Some(format_name) = &plan.format_name {
        println!("Container:     {}", format_name);
    }
    println!(
        "Desired start: {}",
        TimeSpec::from_seconds(plan.desired_cut_from)
    );
    println!(
        "Lossless from: {}",
        TimeSpec::from_seconds(plan.decision.lossless_cut_from)
    );

    match &plan.encode {
        None => println!("Smart cut:     not needed"),
        Some(encode) => {
            println!(
                "Smart cut:     re-encode {} - {}",
                TimeSpec::from_seconds(plan.desired_cut_from),
                TimeSpec::from_seconds(plan.decision.lossless_cut_from)
            );
            println!("Encoder:       {} ({})", encode.encoder, encode.family);
            println!("Bitrate:       {} b/s", encode.codec_params.video_bitrate);
            if let Some(timebase) = encode.codec_params.video_timebase {
                println!("Timebase:      {}", timebase);
            }
            println!("Video args:    {}", encode.video_args.join(" "));
        }
    }
}

#[derive(Serialize)]
struct KeyframeListing {
    input_path: String,
    stream_index: usize,
    from: f64,
    to: f64,
    keyframes: Vec<Keyframe>,
}

/// Execute the keyframes command
pub async fn keyframes(overrides: &GlobalOverrides, args: KeyframesArgs) -> Result<()> {
    let config = prepare(overrides)?;
    let around = TimeSpec::parse(&args.at)?;
    if !args.window.is_finite() || args.window <= 0.0 {
        return Err(DomainError::BadArgs(format!(
            "Window must be a positive number of seconds, got {}",
            args.window
        ))
        .into());
    }

    let container = DefaultAppContainer::new(&config)?;
    let keyframes = container
        .keyframe_port()
        .query_keyframes(&args.input, args.stream, around.seconds, args.window)
        .await?;

    let listing = KeyframeListing {
        input_path: args.input,
        stream_index: args.stream,
        from: (around.seconds - args.window).max(0.0),
        to: around.seconds + args.window,
        keyframes,
    };

    if args.json {
        print_json(&listing)?;
    } else {
        println!(
            "{} keyframes in stream {} between {} and {}",
            listing.keyframes.len(),
            listing.stream_index,
            TimeSpec::from_seconds(listing.from),
            TimeSpec::from_seconds(listing.to)
        );
        for keyframe in &listing.keyframes {
            println!("  {:>12.6}  {}", keyframe.time, TimeSpec::from_seconds(keyframe.time));
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct EncoderArguments<'a> {
    encoder: &'a str,
    family: EncoderFamily,
    supports_quality_value: bool,
    arguments: Vec<String>,
}

/// Execute the encoder-args command
pub fn encoder_args(overrides: &GlobalOverrides, args: EncoderArgsArgs) -> Result<()> {
    let config = prepare(overrides)?;
    let policy = match &args.override_policy {
        Some(policy) => QualityOverridePolicy::parse(policy)?,
        None => config.encoding.quality_override_policy,
    };

    let arguments = EncoderQualityMapper::build_quality_arguments_with_policy(
        &args.encoder,
        args.index,
        args.quality,
        args.preset.as_deref(),
        policy,
    )?;

    if args.json {
        let output = EncoderArguments {
            encoder: &args.encoder,
            family: EncoderFamily::from_encoder(&args.encoder),
            supports_quality_value: EncoderQualityMapper::supports_quality_value(&args.encoder),
            arguments,
        };
        print_json(&output)?;
    } else {
        println!("{}", arguments.join(" "));
    }
    Ok(())
}

#[derive(Serialize)]
struct FamilyRow {
    family: EncoderFamily,
    label: &'static str,
    quality: Option<u32>,
    preset: Option<&'static str>,
    dialect: QualityDialect,
}

/// Execute the encoders command
pub fn encoders(overrides: &GlobalOverrides, args: EncodersArgs) -> Result<()> {
    prepare(overrides)?;

    let rows: Vec<FamilyRow> = EncoderFamily::ALL
        .iter()
        .map(|&family| {
            let profile = family.profile();
            FamilyRow {
                family,
                label: family.label(),
                quality: profile.quality,
                preset: profile.preset,
                dialect: profile.dialect,
            }
        })
        .collect();

    if args.json {
        print_json(&rows)?;
        return Ok(());
    }

    println!("{:<18} {:>8} {:>10}  {}", "FAMILY", "QUALITY", "PRESET", "DIALECT");
    for row in &rows {
        println!(
            "{:<18} {:>8} {:>10}  {:?}",
            row.label,
            row.quality.map_or_else(|| "-".to_string(), |q| q.to_string()),
            row.preset.unwrap_or("-"),
            row.dialect
        );
    }
    Ok(())
}
