use std::path::{Path, PathBuf};

use seqview::registry::{MemoryRegistry, TrackId, TrackInfo};
use seqview::scene::Shape;
use seqview::{Options, SeqViewError, SequenceRenderer};
use web_time::{Duration, Instant};

const DEMO_SEQUENCE: &str = concat!(
    "MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQAPILSRVGDGTQDNLSGAEKAVQVKVK",
    "ALPDAQFEVVHSLAKWKRQTLGQHDFSAGEGLYTHMKALRPDEDRLSPLHSVYVDQWDWE",
    "RVMGDGERQFSTLKSTVEAIWAGIKATEAAVSEEFGLAPFLPDQIHFVHSQELLSRYPDL",
    "DAKGRERAIAKDLGAVFLVGIGGKLSDGHRHDVRAPDYDDWUAIGLNKAIS",
);

fn demo_registry() -> MemoryRegistry {
    let mut registry = MemoryRegistry::new();
    registry.register_simple("domains", "#5b8def");
    registry.register_simple("helices", "#e0524d");
    registry.register_simple("strands", "#f2b134");
    registry.register_simple("variants", "#7a7a7a");
    registry.register_group("variants");
    for (id, color) in [("snp", "#9c27b0"), ("indel", "#26a69a")] {
        registry.register_track(
            id,
            TrackInfo {
                name: id.to_owned(),
                fullname: id.to_uppercase(),
                color: color.to_owned(),
                group: Some("variants".into()),
                disabled: false,
            },
        );
    }
    registry
}

fn rect(x: f64, width: f64) -> Shape {
    Shape::Rect {
        x: x.into(),
        y: 0.0.into(),
        width: width.into(),
        height: 1.0.into(),
    }
}

/// Populate the demo tracks with evenly spread features.
fn draw_features(renderer: &mut SequenceRenderer) {
    let len = renderer.sequence().len() as f64;
    let features: [(&str, f64, f64); 4] = [
        ("helices", 7.0, 11.0),
        ("strands", 13.0, 5.0),
        ("snp", 17.0, 1.0),
        ("indel", 29.0, 3.0),
    ];
    for (track, spacing, width) in features {
        let id = TrackId::from(track);
        let mut x = spacing / 2.0;
        while x + width < len {
            let _ = renderer.add_primitive(&id, rect(x, width));
            x += spacing + width;
        }
    }
    let domains = TrackId::from("domains");
    let _ = renderer.add_primitive(&domains, rect(4.0, len * 0.4));
    let _ = renderer.add_primitive(&domains, rect(len * 0.55, len * 0.35));
    if let Some(set) = renderer.track_set_mut(&domains) {
        set.set_fixed_track_height(Some(1.0));
    }
}

/// Tick with a simulated clock until every timer has fired.
fn run_until_idle(
    renderer: &mut SequenceRenderer,
    mut now: Instant,
) -> Result<Instant, SeqViewError> {
    while let Some(deadline) = renderer.next_deadline() {
        now = now.max(deadline);
        let _ = renderer.tick(now)?;
        now += Duration::from_millis(1);
    }
    Ok(now)
}

fn main() -> Result<(), SeqViewError> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let sequence = args.next().unwrap_or_else(|| DEMO_SEQUENCE.to_owned());
    let out = args
        .next()
        .map_or_else(|| PathBuf::from("seqview.svg"), PathBuf::from);
    let options = match args.next() {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };

    let mut renderer = SequenceRenderer::new(options, Box::new(demo_registry()));
    let start = Instant::now();
    renderer.set_sequence(&sequence, start)?;
    let order: Vec<TrackId> = ["domains", "helices", "strands", "variants"]
        .into_iter()
        .map(TrackId::from)
        .collect();
    let resolved = renderer.set_track_order(&order, start)?;
    log::info!("track order: {resolved:?}");

    draw_features(&mut renderer);
    let _ = renderer.refresh(false, start)?;
    let _ = renderer.set_zoom(4.0, start)?;
    let now = run_until_idle(&mut renderer, start)?;
    renderer.select(20, 40)?;
    let _ = run_until_idle(&mut renderer, now)?;

    for event in renderer.drain_events() {
        log::debug!("{event:?}");
    }

    std::fs::write(&out, renderer.to_svg())?;
    let nav = out.with_extension("nav.svg");
    std::fs::write(&nav, renderer.navigation_svg())?;
    log::info!(
        "wrote {} and {} ({} residues, zoom {})",
        out.display(),
        nav.display(),
        renderer.sequence().len(),
        renderer.zoom()
    );
    Ok(())
}
