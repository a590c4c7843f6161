//! Scene building
//!
//! Walks the survey document's entities and produces a layer-partitioned
//! scene graph. All line-kind output for a layer is merged into one
//! batched segment list — one drawable per layer instead of one per
//! entity — which is what keeps draw calls in the hundreds instead of the
//! tens of thousands on a real terminal survey. Malformed entities are
//! skipped and counted, never fatal: a bad export yields a best-effort
//! partial scene plus diagnostics.

use glam::{Mat4, Vec3};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use yardkit_core::constants::{ELLIPSE_SEGMENTS, MAX_INSERT_DEPTH, SPLINE_MIN_SAMPLES};
use yardkit_core::{Point2, Point3, SceneError};
use yardkit_geometry::{bulge_arc_points, circular_arc_points, ellipse_points};
use yardkit_survey::{CoordinateSystem, Entity, EntityKind, HatchEdge, SurveyDocument};

use crate::cache::{BoxDimensions, GeometryCache, MarkerInstance};
use crate::labels::{label_canvas_size, strip_mtext_codes, LabelSprite};

/// Tessellation segments for a full circle
const CIRCLE_SEGMENTS: usize = 64;

/// Tessellation segments for a circular arc
const ARC_SEGMENTS: usize = 32;

/// Default segments per bulge arc
const BULGE_SEGMENTS: usize = 16;

/// Tolerance for deduplicating shared path endpoints (survey units)
const JOIN_EPSILON: f64 = 1e-9;

/// Scene build options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneOptions {
    /// Layers skipped entirely (construction/annotation layers etc.)
    pub excluded_layers: Vec<String>,
    /// Convert entities on frozen layers anyway
    pub include_frozen_layers: bool,
    /// Segments per bulge arc
    pub bulge_segments: usize,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            excluded_layers: Vec::new(),
            include_frozen_layers: false,
            bulge_segments: BULGE_SEGMENTS,
        }
    }
}

/// Merged line segments for one layer: consecutive pairs are segment
/// endpoints, rendered as a single batched drawable
#[derive(Debug, Clone, Default)]
pub struct LineBatch {
    pub positions: Vec<Vec3>,
}

impl LineBatch {
    fn push_segment(&mut self, a: Vec3, b: Vec3) {
        self.positions.push(a);
        self.positions.push(b);
    }

    pub fn segment_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Filled region laid flat in world space (hatch or solid)
#[derive(Debug, Clone)]
pub struct FilledShape {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl FilledShape {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// All drawables belonging to one layer, for visibility toggling
#[derive(Debug, Clone)]
pub struct LayerGroup {
    pub name: String,
    pub color_index: Option<u8>,
    pub visible: bool,
    pub lines: LineBatch,
    pub fills: Vec<FilledShape>,
}

impl LayerGroup {
    fn new(name: &str, color_index: Option<u8>) -> Self {
        Self {
            name: name.to_string(),
            color_index,
            visible: true,
            lines: LineBatch::default(),
            fills: Vec::new(),
        }
    }
}

/// Skip-and-count diagnostics for one build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Entities successfully converted (insert expansions count their
    /// children, not the insert itself)
    pub entities_converted: usize,
    /// Line segments emitted across all batches
    pub segments_emitted: usize,
    /// Filled shapes emitted
    pub fills_emitted: usize,
    /// Label sprites emitted
    pub labels_emitted: usize,
    /// Entities dropped for non-finite coordinates or missing blocks
    pub skipped_invalid: usize,
    /// Entities dropped by layer exclusion or frozen layers
    pub skipped_excluded: usize,
    /// Entities dropped as geometrically degenerate (e.g. 2-point hatch)
    pub skipped_degenerate: usize,
    /// Entities of kinds the pipeline does not draw
    pub skipped_unsupported: usize,
}

impl SceneStats {
    /// Total entities dropped for any reason
    pub fn total_skipped(&self) -> usize {
        self.skipped_invalid + self.skipped_excluded + self.skipped_degenerate + self.skipped_unsupported
    }
}

/// The layer-partitioned output of a scene build
#[derive(Debug)]
pub struct SceneGraph {
    /// Layer groups sorted by name
    pub layers: Vec<LayerGroup>,
    /// Flat label list for camera-distance scaling in the render loop
    pub labels: Vec<LabelSprite>,
    /// Container box instances added after the base build
    pub markers: Vec<MarkerInstance>,
    /// The coordinate system the scene was built with, for later
    /// click-to-survey lookups
    pub coordinate_system: CoordinateSystem,
    pub stats: SceneStats,
}

impl SceneGraph {
    /// Find a layer group by name
    pub fn layer(&self, name: &str) -> Option<&LayerGroup> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Toggle a layer's visibility flag; returns false for unknown layers
    pub fn set_layer_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.layers.iter_mut().find(|l| l.name == name) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Total line segments across all layers
    pub fn total_segments(&self) -> usize {
        self.layers.iter().map(|l| l.lines.segment_count()).sum()
    }
}

struct Accumulator<'a> {
    groups: BTreeMap<String, LayerGroup>,
    labels: Vec<LabelSprite>,
    stats: SceneStats,
    doc: &'a SurveyDocument,
    options: &'a SceneOptions,
    cs: &'a CoordinateSystem,
}

impl<'a> Accumulator<'a> {
    fn group(&mut self, layer: &str) -> &mut LayerGroup {
        if !self.groups.contains_key(layer) {
            let color = self
                .doc
                .layers
                .get(layer)
                .and_then(|info| info.color_index);
            self.groups
                .insert(layer.to_string(), LayerGroup::new(layer, color));
        }
        self.groups.get_mut(layer).expect("group just inserted")
    }

    fn layer_excluded(&self, layer: &str) -> bool {
        if self.options.excluded_layers.iter().any(|l| l == layer) {
            return true;
        }
        if !self.options.include_frozen_layers {
            if let Some(info) = self.doc.layers.get(layer) {
                return info.frozen;
            }
        }
        false
    }
}

/// Builds scene graphs from survey documents.
///
/// Owns the container-box geometry cache; one builder per loaded scene,
/// with [`clear_cache`](Self::clear_cache) called on teardown.
#[derive(Debug, Default)]
pub struct SceneBuilder {
    cache: GeometryCache,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene graph from a document and its coordinate system.
    ///
    /// Never fails on malformed entities: each is skipped and counted in
    /// [`SceneStats`], and the rest of the document still converts.
    pub fn build(
        &mut self,
        doc: &SurveyDocument,
        cs: &CoordinateSystem,
        options: &SceneOptions,
    ) -> SceneGraph {
        let mut accum = Accumulator {
            groups: BTreeMap::new(),
            labels: Vec::new(),
            stats: SceneStats::default(),
            doc,
            options,
            cs,
        };

        // Entities convert through a matrix that maps axis-swapped survey
        // points into world space; the root transform applies the
        // document centering, block expansion composes onto it.
        let root = Mat4::from_translation(-axis_swap_unchecked(cs.center, cs.scale));
        for entity in &doc.entities {
            convert_entity(entity, root, 0, &mut accum);
        }

        let stats = accum.stats;
        debug!(
            entities = stats.entities_converted,
            segments = stats.segments_emitted,
            skipped = stats.total_skipped(),
            "scene build complete"
        );

        SceneGraph {
            layers: accum.groups.into_values().collect(),
            labels: accum.labels,
            markers: Vec::new(),
            coordinate_system: *cs,
            stats,
        }
    }

    /// Build a container-box marker at a world position, sharing geometry
    /// with every other marker of the same dimensions.
    pub fn container_marker(
        &mut self,
        occupant_id: &str,
        position: Vec3,
        rotation_deg: f32,
        dims: BoxDimensions,
    ) -> MarkerInstance {
        let geometry = self.cache.box_geometry(dims);
        let transform = Mat4::from_translation(position)
            * Mat4::from_rotation_y(rotation_deg.to_radians());
        MarkerInstance {
            geometry,
            transform,
            occupant_id: occupant_id.to_string(),
        }
    }

    /// Number of distinct box geometries currently cached
    pub fn cached_geometries(&self) -> usize {
        self.cache.len()
    }

    /// Drop cached geometry; call when the scene is torn down
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

/// Axis swap without finiteness checks, for composing transforms
fn axis_swap_unchecked(p: Point3, scale: f64) -> Vec3 {
    Vec3::new(
        (p.x * scale) as f32,
        (p.z * scale) as f32,
        (-p.y * scale) as f32,
    )
}

/// Map a survey point through the axis swap and the current transform
fn map_point(p: Point3, scale: f64, transform: &Mat4) -> Option<Vec3> {
    if !p.is_finite() || !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let v = transform.transform_point3(axis_swap_unchecked(p, scale));
    v.is_finite().then_some(v)
}

fn map_plane_point(p: Point2, scale: f64, transform: &Mat4) -> Option<Vec3> {
    map_point(Point3::new(p.x, p.y, 0.0), scale, transform)
}

fn convert_entity(entity: &Entity, transform: Mat4, depth: usize, accum: &mut Accumulator<'_>) {
    if accum.layer_excluded(&entity.layer) {
        accum.stats.skipped_excluded += 1;
        return;
    }

    match &entity.kind {
        EntityKind::Line { start, end } => {
            let scale = accum.cs.scale;
            match (
                map_point(*start, scale, &transform),
                map_point(*end, scale, &transform),
            ) {
                (Some(a), Some(b)) => {
                    accum.group(&entity.layer).lines.push_segment(a, b);
                    accum.stats.segments_emitted += 1;
                    accum.stats.entities_converted += 1;
                }
                _ => accum.stats.skipped_invalid += 1,
            }
        }

        EntityKind::Polyline { vertices, closed } => {
            let run = tessellate_polyline(vertices, *closed, accum.options.bulge_segments);
            if run.len() < 2 {
                accum.stats.skipped_degenerate += 1;
                return;
            }
            emit_run(&entity.layer, &run, transform, accum);
            accum.stats.entities_converted += 1;
        }

        EntityKind::Circle { center, radius } => {
            let run = circular_arc_points(*center, *radius, 0.0, 360.0, CIRCLE_SEGMENTS);
            if run.len() < 2 {
                accum.stats.skipped_invalid += 1;
                return;
            }
            emit_run(&entity.layer, &run, transform, accum);
            accum.stats.entities_converted += 1;
        }

        EntityKind::Arc {
            center,
            radius,
            start_angle_deg,
            end_angle_deg,
        } => {
            let run =
                circular_arc_points(*center, *radius, *start_angle_deg, *end_angle_deg, ARC_SEGMENTS);
            if run.len() < 2 {
                accum.stats.skipped_invalid += 1;
                return;
            }
            emit_run(&entity.layer, &run, transform, accum);
            accum.stats.entities_converted += 1;
        }

        EntityKind::Ellipse {
            center,
            major_axis_end,
            axis_ratio,
            start_param,
            end_param,
        } => {
            let run = ellipse_points(
                *center,
                *major_axis_end,
                *axis_ratio,
                *start_param,
                *end_param,
                ELLIPSE_SEGMENTS,
            );
            if run.len() < 2 {
                accum.stats.skipped_invalid += 1;
                return;
            }
            emit_run(&entity.layer, &run, transform, accum);
            accum.stats.entities_converted += 1;
        }

        EntityKind::Insert {
            block,
            position,
            rotation_deg,
            scale,
        } => {
            convert_insert(block, *position, *rotation_deg, *scale, transform, depth, accum);
        }

        EntityKind::Text {
            value,
            position,
            height,
            rotation_deg,
        } => {
            convert_label(entity, value, *position, *height, *rotation_deg, transform, accum);
        }

        EntityKind::MText {
            value,
            position,
            height,
            rotation_deg,
        } => {
            let stripped = strip_mtext_codes(value);
            convert_label(entity, &stripped, *position, *height, *rotation_deg, transform, accum);
        }

        EntityKind::Hatch { paths } => {
            convert_hatch(entity, paths, transform, accum);
        }

        EntityKind::Spline {
            degree,
            control_points,
            fit_points,
        } => {
            // Fit points lie exactly on the curve; prefer them over the
            // control polygon when both are present.
            let source = if !fit_points.is_empty() {
                fit_points
            } else {
                control_points
            };
            let run = sample_spline(source, *degree);
            if run.len() < 2 {
                accum.stats.skipped_degenerate += 1;
                return;
            }
            emit_run(&entity.layer, &run, transform, accum);
            accum.stats.entities_converted += 1;
        }

        EntityKind::Solid { points } => {
            convert_solid(entity, points, transform, accum);
        }

        EntityKind::Unsupported => {
            accum.stats.skipped_unsupported += 1;
        }
    }
}

/// Flatten a polyline into one shared-vertex point run, expanding bulges.
fn tessellate_polyline(
    vertices: &[yardkit_survey::PolylineVertex],
    closed: bool,
    bulge_segments: usize,
) -> Vec<Point2> {
    if vertices.len() < 2 {
        return Vec::new();
    }

    let mut run: Vec<Point2> = Vec::new();
    let segment_count = if closed {
        vertices.len()
    } else {
        vertices.len() - 1
    };

    for i in 0..segment_count {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let piece = if a.bulge.abs() > f64::EPSILON {
            bulge_arc_points(a.point, b.point, a.bulge, bulge_segments)
        } else {
            vec![a.point, b.point]
        };
        if piece.is_empty() {
            continue;
        }
        if run.is_empty() {
            run.extend(piece);
        } else {
            // Consecutive pieces share their join vertex.
            run.extend(piece.into_iter().skip(1));
        }
    }
    run
}

/// Emit a point run as batched segments on the entity's layer.
fn emit_run(layer: &str, run: &[Point2], transform: Mat4, accum: &mut Accumulator<'_>) {
    let scale = accum.cs.scale;
    let mut emitted = 0usize;
    let mut dropped = 0usize;
    {
        let group = accum.group(layer);
        let mut prev: Option<Vec3> = None;
        for p in run {
            match map_plane_point(*p, scale, &transform) {
                Some(v) => {
                    if let Some(prev) = prev {
                        group.lines.push_segment(prev, v);
                        emitted += 1;
                    }
                    prev = Some(v);
                }
                None => {
                    // Break the run at the bad vertex rather than bridging
                    // across it.
                    prev = None;
                    dropped += 1;
                }
            }
        }
    }
    accum.stats.segments_emitted += emitted;
    accum.stats.skipped_invalid += dropped;
}

fn convert_insert(
    block_name: &str,
    position: Point3,
    rotation_deg: f64,
    scale: [f64; 3],
    transform: Mat4,
    depth: usize,
    accum: &mut Accumulator<'_>,
) {
    if depth >= MAX_INSERT_DEPTH {
        warn!(block = block_name, depth, "insert nesting too deep; skipping");
        accum.stats.skipped_invalid += 1;
        return;
    }
    let doc = accum.doc;
    let Some(block) = doc.block(block_name) else {
        warn!(block = block_name, "insert references unknown block; skipping");
        accum.stats.skipped_invalid += 1;
        return;
    };
    if !position.is_finite() || !rotation_deg.is_finite() || scale.iter().any(|s| !s.is_finite()) {
        accum.stats.skipped_invalid += 1;
        return;
    }

    // Block X scale stays on world X; block Y scale maps onto the world
    // depth axis (Z) and block Z onto the world up axis (Y), matching the
    // point axis swap.
    let child = transform
        * Mat4::from_translation(axis_swap_unchecked(position, accum.cs.scale))
        * Mat4::from_rotation_y((rotation_deg as f32).to_radians())
        * Mat4::from_scale(Vec3::new(scale[0] as f32, scale[2] as f32, scale[1] as f32))
        * Mat4::from_translation(-axis_swap_unchecked(block.base_point, accum.cs.scale));

    for child_entity in &block.entities {
        convert_entity(child_entity, child, depth + 1, accum);
    }
}

fn convert_label(
    entity: &Entity,
    text: &str,
    position: Point3,
    height: f64,
    rotation_deg: f64,
    transform: Mat4,
    accum: &mut Accumulator<'_>,
) {
    if !height.is_finite() || height <= 0.0 || !rotation_deg.is_finite() {
        accum.stats.skipped_invalid += 1;
        return;
    }
    let Some(world_pos) = map_point(position, accum.cs.scale, &transform) else {
        accum.stats.skipped_invalid += 1;
        return;
    };
    let canvas_size = label_canvas_size(text, rotation_deg);
    accum.labels.push(LabelSprite {
        text: text.to_string(),
        position: world_pos.to_array(),
        world_height: (height * accum.cs.scale) as f32,
        rotation_deg: rotation_deg as f32,
        canvas_size,
        layer: entity.layer.clone(),
    });
    accum.stats.labels_emitted += 1;
    accum.stats.entities_converted += 1;
}

/// Flatten one hatch boundary path's edges into a single point run,
/// dropping duplicated shared endpoints between consecutive edges.
fn flatten_hatch_path(edges: &[HatchEdge], bulge_segments: usize) -> Vec<Point2> {
    let mut run: Vec<Point2> = Vec::new();
    for edge in edges {
        let piece = match edge {
            HatchEdge::Polyline { vertices } => tessellate_polyline(vertices, false, bulge_segments),
            HatchEdge::Line { start, end } => {
                if start.is_finite() && end.is_finite() {
                    vec![*start, *end]
                } else {
                    Vec::new()
                }
            }
            HatchEdge::Arc {
                center,
                radius,
                start_angle_deg,
                end_angle_deg,
            } => circular_arc_points(*center, *radius, *start_angle_deg, *end_angle_deg, ARC_SEGMENTS),
        };
        let mut iter = piece.into_iter();
        if let Some(first) = iter.next() {
            let duplicate = run
                .last()
                .is_some_and(|last| last.distance_to(first) < JOIN_EPSILON);
            if !duplicate {
                run.push(first);
            }
            run.extend(iter);
        }
    }
    // A closing vertex equal to the start is implied by the fill.
    if run.len() > 1
        && run
            .first()
            .zip(run.last())
            .is_some_and(|(a, b)| a.distance_to(*b) < JOIN_EPSILON)
    {
        run.pop();
    }
    run
}

fn convert_hatch(
    entity: &Entity,
    paths: &[Vec<HatchEdge>],
    transform: Mat4,
    accum: &mut Accumulator<'_>,
) {
    let mut emitted = false;
    for edges in paths {
        let run = flatten_hatch_path(edges, accum.options.bulge_segments);
        if run.len() < 3 {
            accum.stats.skipped_degenerate += 1;
            continue;
        }
        match tessellate_fill(&run, accum.cs.scale, &transform, &entity.layer) {
            Ok(shape) => {
                accum.group(&entity.layer).fills.push(shape);
                accum.stats.fills_emitted += 1;
                emitted = true;
            }
            Err(err) => {
                warn!(error = %err, "hatch fill skipped");
                accum.stats.skipped_degenerate += 1;
            }
        }
    }
    if emitted {
        accum.stats.entities_converted += 1;
    }
}

/// Fill-tessellate a closed boundary run and lift it into world space.
fn tessellate_fill(
    run: &[Point2],
    scale: f64,
    transform: &Mat4,
    layer: &str,
) -> std::result::Result<FilledShape, SceneError> {
    let mut builder = Path::builder();
    builder.begin(point(run[0].x as f32, run[0].y as f32));
    for p in &run[1..] {
        builder.line_to(point(p.x as f32, p.y as f32));
    }
    builder.close();
    let path = builder.build();

    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
        )
        .map_err(|e| SceneError::Tessellation {
            layer: layer.to_string(),
            reason: format!("{:?}", e),
        })?;

    if buffers.indices.is_empty() {
        return Err(SceneError::Tessellation {
            layer: layer.to_string(),
            reason: "boundary produced no triangles".to_string(),
        });
    }

    let mut vertices = Vec::with_capacity(buffers.vertices.len());
    for [x, y] in buffers.vertices {
        let mapped = map_plane_point(Point2::new(x as f64, y as f64), scale, transform).ok_or_else(
            || SceneError::Tessellation {
                layer: layer.to_string(),
                reason: "non-finite vertex after transform".to_string(),
            },
        )?;
        vertices.push(mapped);
    }
    Ok(FilledShape {
        vertices,
        indices: buffers.indices,
    })
}

fn convert_solid(
    entity: &Entity,
    points: &[Point2],
    transform: Mat4,
    accum: &mut Accumulator<'_>,
) {
    if points.len() < 3 || points.len() > 4 || points.iter().any(|p| !p.is_finite()) {
        accum.stats.skipped_invalid += 1;
        return;
    }
    let scale = accum.cs.scale;
    let mut vertices = Vec::with_capacity(points.len());
    for p in points {
        match map_plane_point(*p, scale, &transform) {
            Some(v) => vertices.push(v),
            None => {
                accum.stats.skipped_invalid += 1;
                return;
            }
        }
    }
    let indices = if vertices.len() == 3 {
        vec![0, 1, 2]
    } else {
        // Two triangles sharing the 0-2 diagonal.
        vec![0, 1, 2, 0, 2, 3]
    };
    accum
        .group(&entity.layer)
        .fills
        .push(FilledShape { vertices, indices });
    accum.stats.fills_emitted += 1;
    accum.stats.entities_converted += 1;
}

/// Sample a smooth interpolating curve through the given points.
///
/// Centripetal-style Catmull-Rom with clamped ends: the curve passes
/// through every input point. Sample count scales with degree and point
/// count, floored at the minimum.
fn sample_spline(points: &[Point2], degree: u32) -> Vec<Point2> {
    let usable: Vec<Point2> = points.iter().copied().filter(Point2::is_finite).collect();
    if usable.len() < 2 {
        return Vec::new();
    }
    if usable.len() == 2 {
        return usable;
    }

    let samples = SPLINE_MIN_SAMPLES.max(usable.len() * degree.max(1) as usize * 8);
    let spans = usable.len() - 1;
    let mut out = Vec::with_capacity(samples + 1);
    for i in 0..=samples {
        let t = i as f64 / samples as f64 * spans as f64;
        let span = (t.floor() as usize).min(spans - 1);
        let local = t - span as f64;

        let p0 = usable[span.saturating_sub(1)];
        let p1 = usable[span];
        let p2 = usable[span + 1];
        let p3 = usable[(span + 2).min(usable.len() - 1)];

        let p = catmull_rom(p0, p1, p2, p3, local);
        if p.is_finite() {
            out.push(p);
        }
    }
    out
}

fn catmull_rom(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    let t2 = t * t;
    let t3 = t2 * t;
    let blend = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point2::new(
        blend(p0.x, p1.x, p2.x, p3.x),
        blend(p0.y, p1.y, p2.y, p3.y),
    )
}
