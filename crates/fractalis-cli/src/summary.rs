use std::path::PathBuf;
use std::time::Duration;

use console::Style;
use fractalis_core::device::RecordingLed;
use fractalis_core::kernel::Precision;
use fractalis_core::render::overlay::coordinate_decimals;
use fractalis_core::scalar::DoubleDouble;
use fractalis_core::state::EngineState;
use num_complex::Complex;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub struct RenderSummary {
    pub center: Complex<DoubleDouble>,
    pub zoom: f64,
    pub width: usize,
    pub height: usize,
    pub limit: u32,
    pub precision: Precision,
    pub elapsed: Duration,
    pub output: PathBuf,
}

/// Counters collected by `fractalis run`.
#[derive(Default)]
pub struct SessionSummary {
    pub ticks: u64,
    pub elapsed: Duration,
    pub presses: usize,
    pub dive_pans: usize,
    pub dive_zooms: usize,
    pub lockstep: bool,
    pub passes: usize,
    pub extended_passes: usize,
    pub cancelled: usize,
    pub frames_saved: usize,
    pub output: PathBuf,
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

fn print_viewport(s: &Styles, center: Complex<DoubleDouble>, zoom: f64) {
    let decimals = coordinate_decimals(zoom);
    println!("  {}", s.header.apply_to("Viewport"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Re"),
        s.value.apply_to(center.re.to_string_fixed(decimals))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Im"),
        s.value.apply_to(center.im.to_string_fixed(decimals))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Zoom"),
        s.value.apply_to(format!("x{zoom:.3e}"))
    );
    println!();
}

pub fn print_render_summary(summary: &RenderSummary) {
    let s = Styles::new();
    print_title(&s, "Fractalis Render");

    print_viewport(&s, summary.center, summary.zoom);

    println!("  {}", s.header.apply_to("Kernel"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Precision"),
        s.method.apply_to(summary.precision)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Iterations"),
        s.value.apply_to(summary.limit)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{}x{}", summary.width, summary.height))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Time"),
        s.value.apply_to(format!("{:.2}s", summary.elapsed.as_secs_f64()))
    );
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(summary.output.display())
    );
    println!();
}

pub fn print_session_summary(state: &EngineState, led: &RecordingLed, summary: &SessionSummary) {
    let s = Styles::new();
    print_title(&s, "Fractalis Session");

    print_viewport(&s, state.effective_center(), state.zoom_level());

    println!("  {}", s.header.apply_to("Engine"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Phase"),
        s.method.apply_to(state.calculating())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Iterations"),
        s.value.apply_to(state.iteration_limit())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Generation"),
        s.value.apply_to(state.calculation_id())
    );
    if summary.lockstep {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Passes"),
            s.value.apply_to(format!(
                "{} ({} extended, {} cancelled)",
                summary.passes, summary.extended_passes, summary.cancelled
            ))
        );
    }
    let [r, g, b] = led.rgb();
    println!(
        "    {:<12}{}",
        s.label.apply_to("LED"),
        s.value.apply_to(format!("#{r:02x}{g:02x}{b:02x}"))
    );
    println!();

    println!("  {}", s.header.apply_to("Session"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Ticks"),
        s.value.apply_to(format!(
            "{} in {:.2}s",
            summary.ticks,
            summary.elapsed.as_secs_f64()
        ))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Presses"),
        s.value.apply_to(summary.presses)
    );
    if state.auto_zoom() || summary.dive_pans + summary.dive_zooms > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Auto-zoom"),
            s.value.apply_to(format!(
                "{} pans, {} zooms",
                summary.dive_pans, summary.dive_zooms
            ))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Auto-zoom"),
            s.disabled.apply_to("off")
        );
    }
    if summary.frames_saved > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Frames"),
            s.value.apply_to(summary.frames_saved)
        );
    }
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(summary.output.display())
    );
    println!();
}
