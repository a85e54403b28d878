//! Command-line argument definitions

use clap::Args;

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: String,

    /// Desired cut start (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub at: String,

    /// Video stream index to cut on (default: first real video stream)
    #[arg(short, long)]
    pub stream: Option<usize>,

    /// Encoder for the bridging segment (default: config, then source codec)
    #[arg(short, long)]
    pub encoder: Option<String>,

    /// Quality override (CRF/CQ/global quality/QP, depending on the encoder)
    #[arg(short, long)]
    pub quality: Option<u32>,

    /// Preset override
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Output stream index the encoder arguments are scoped to
    #[arg(long, default_value_t = 0)]
    pub output_index: usize,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the keyframes command
#[derive(Args, Debug)]
pub struct KeyframesArgs {
    /// Input media file path
    #[arg(short, long)]
    pub input: String,

    /// Center of the search window (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long)]
    pub at: String,

    /// Stream index
    #[arg(short, long, default_value_t = 0)]
    pub stream: usize,

    /// Half-width of the search window in seconds
    #[arg(short, long, default_value_t = 10.0)]
    pub window: f64,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the encoder-args command
#[derive(Args, Debug)]
pub struct EncoderArgsArgs {
    /// Encoder name as passed to ffmpeg `-c:v`
    #[arg(short, long)]
    pub encoder: String,

    /// Output stream index
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Quality override
    #[arg(short, long)]
    pub quality: Option<u32>,

    /// Preset override
    #[arg(short, long)]
    pub preset: Option<String>,

    /// What to do with a quality override the encoder cannot express
    /// (reject, pass-through; default: config)
    #[arg(long)]
    pub override_policy: Option<String>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the encoders command
#[derive(Args, Debug)]
pub struct EncodersArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
