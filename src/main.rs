use anyhow::{bail, Context};
use yardkit::{
    init_logging, suggest, CoordinateSystem, SceneBuilder, SceneError, SceneOptions, SlotMap,
    SurveyDocument, Zone,
};

fn usage() -> ! {
    eprintln!("Usage: yardkit <survey.json> [--exclude LAYER,LAYER,...] [--suggest [ZONE]]");
    std::process::exit(2);
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else { usage() };
    if path == "--help" || path == "-h" {
        usage();
    }
    if path == "--version" || path == "-V" {
        println!("yardkit {} (built {})", env!("CARGO_PKG_VERSION"), yardkit::build_date());
        return Ok(());
    }

    let mut options = SceneOptions::default();
    let mut run_suggest = false;
    let mut zone_preference: Option<Zone> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--exclude" => {
                let Some(layers) = args.next() else { usage() };
                options
                    .excluded_layers
                    .extend(layers.split(',').map(str::to_string));
            }
            "--suggest" => {
                run_suggest = true;
                if let Some(zone) = args.next() {
                    zone_preference = Some(match zone.as_str() {
                        "A" => Zone::A,
                        "B" => Zone::B,
                        "C" => Zone::C,
                        "D" => Zone::D,
                        "E" => Zone::E,
                        other => bail!("unknown zone: {}", other),
                    });
                }
            }
            _ => usage(),
        }
    }

    let doc = SurveyDocument::from_json_file(&path)
        .with_context(|| format!("loading survey document {}", path))?;

    let cs = CoordinateSystem::derive(&doc.header).ok_or(SceneError::NoCoordinateSystem {
        reason: "header extents missing or non-finite".to_string(),
    })?;

    let mut builder = SceneBuilder::new();
    let scene = builder.build(&doc, &cs, &options);

    let report = serde_json::json!({
        "unit": cs.unit.to_string(),
        "scale": cs.scale,
        "center": cs.center,
        "bounds": cs.bounds,
        "layers": scene
            .layers
            .iter()
            .map(|l| {
                serde_json::json!({
                    "name": l.name,
                    "segments": l.lines.segment_count(),
                    "fills": l.fills.len(),
                })
            })
            .collect::<Vec<_>>(),
        "labels": scene.labels.len(),
        "stats": scene.stats,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if run_suggest {
        // Demo scan against an empty yard; real callers supply their
        // persistence layer's occupancy snapshot.
        let occupancy = SlotMap::new();
        let suggestion = suggest(zone_preference, &occupancy)?;
        println!("{}", serde_json::to_string_pretty(&suggestion)?);
    }

    Ok(())
}
