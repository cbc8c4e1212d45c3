//! Selective bloom compositor.
//!
//! Per frame:
//! 1. darken: every drawable node off the bloom layer gets the hidden material
//! 2. render the darkened scene and run the bloom pass into the glow buffer
//! 3. restore: every saved material goes back, the table is drained
//! 4. render the full scene into the primary buffer
//! 5. composite primary + glow onto the screen
//!
//! Step 3 runs even when step 2 fails. Any failure falls back to one direct
//! render for that frame.

use crate::api::types::{MaterialId, NodeId};
use crate::components::material::MaterialLibrary;
use crate::core::scene::Scene;
use crate::error::RenderError;
use crate::renderer::bloom::{BloomSettings, TargetSizes};
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::traits::{FrameData, RenderTarget, Renderer};

/// Original materials of nodes hidden for the bloom pass.
#[derive(Debug, Default)]
pub struct MaterialSwapTable {
    saved: Vec<(NodeId, MaterialId)>,
}

impl MaterialSwapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide every drawable node that is not bloom-eligible. Returns how many were swapped.
    pub fn darken(&mut self, scene: &mut Scene, hidden: MaterialId) -> usize {
        if !self.saved.is_empty() {
            log::warn!("material swap table not drained ({} entries), restoring first", self.saved.len());
            self.restore(scene);
        }
        for node in scene.iter_mut() {
            if !node.visible || node.layers.is_bloom() {
                continue;
            }
            let Some(material) = node.material else { continue };
            if material == hidden {
                continue;
            }
            self.saved.push((node.id, material));
            node.material = Some(hidden);
        }
        self.saved.len()
    }

    /// Put every saved material back and drain the table.
    pub fn restore(&mut self, scene: &mut Scene) {
        for (id, material) in self.saved.drain(..) {
            if let Some(node) = scene.get_mut(id) {
                node.material = Some(material);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// What happened to a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Bloom and normal renders were composited.
    Composited,
    /// Bloom is switched off; the scene was drawn straight to the screen.
    Direct,
    /// The bloom pipeline failed; a direct render was presented instead.
    Fallback(RenderError),
    /// Even the direct render failed. The frame is lost; the session goes on.
    Failed(RenderError),
}

impl FrameOutcome {
    /// Wire code reported to the page.
    pub fn code(&self) -> u32 {
        match self {
            FrameOutcome::Composited => 0,
            FrameOutcome::Direct => 1,
            FrameOutcome::Fallback(_) => 2,
            FrameOutcome::Failed(_) => 3,
        }
    }
}

/// Running totals, exposed for the debug overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositorStats {
    pub composited: u64,
    pub direct: u64,
    pub fallbacks: u64,
    pub failures: u64,
}

pub struct SelectiveBloom {
    pub settings: BloomSettings,
    /// When false every frame is a direct render.
    pub enabled: bool,
    swap: MaterialSwapTable,
    sizes: TargetSizes,
    stats: CompositorStats,
}

impl SelectiveBloom {
    pub fn new(settings: BloomSettings, viewport: &Viewport) -> Self {
        let (w, h) = viewport.physical_size();
        Self {
            settings,
            enabled: true,
            swap: MaterialSwapTable::new(),
            sizes: TargetSizes::for_physical(w, h),
            stats: CompositorStats::default(),
        }
    }

    pub fn sizes(&self) -> TargetSizes {
        self.sizes
    }

    pub fn stats(&self) -> CompositorStats {
        self.stats
    }

    /// Entries still waiting to be restored. Zero between frames.
    pub fn pending_swaps(&self) -> usize {
        self.swap.len()
    }

    /// Resize every offscreen target and full-screen pass. Idempotent; never touches the scene.
    pub fn resize(&mut self, viewport: &Viewport, renderer: &mut dyn Renderer) {
        if viewport.is_empty() {
            log::warn!("ignoring resize to empty viewport {}x{}", viewport.width, viewport.height);
            return;
        }
        let (w, h) = viewport.physical_size();
        let sizes = TargetSizes::for_physical(w, h);
        if sizes == self.sizes {
            return;
        }
        self.sizes = sizes;
        renderer.resize(w, h);
    }

    /// Produce one frame.
    pub fn render_frame(
        &mut self,
        scene: &mut Scene,
        materials: &MaterialLibrary,
        camera: &PerspectiveCamera,
        renderer: &mut dyn Renderer,
    ) -> FrameOutcome {
        if !self.enabled {
            return match Self::direct(scene, materials, camera, renderer) {
                Ok(()) => {
                    self.stats.direct += 1;
                    FrameOutcome::Direct
                }
                Err(err) => self.lost(err),
            };
        }

        match self.composite_passes(scene, materials, camera, renderer) {
            Ok(()) => {
                self.stats.composited += 1;
                FrameOutcome::Composited
            }
            Err(err) => {
                log::warn!("bloom composite failed, falling back to direct render: {err}");
                renderer.reset_frame();
                match Self::direct(scene, materials, camera, renderer) {
                    Ok(()) => {
                        self.stats.fallbacks += 1;
                        FrameOutcome::Fallback(err)
                    }
                    Err(fallback_err) => self.lost(fallback_err),
                }
            }
        }
    }

    fn composite_passes(
        &mut self,
        scene: &mut Scene,
        materials: &MaterialLibrary,
        camera: &PerspectiveCamera,
        renderer: &mut dyn Renderer,
    ) -> Result<(), RenderError> {
        self.swap.darken(scene, materials.hidden());
        let glow = {
            let frame = FrameData { scene: &*scene, materials, camera };
            renderer
                .render_scene(&frame, RenderTarget::BloomSource)
                .and_then(|()| {
                    renderer.bloom_pass(&self.settings, RenderTarget::BloomSource, RenderTarget::Bloom)
                })
        };
        self.swap.restore(scene);
        glow?;

        let frame = FrameData { scene: &*scene, materials, camera };
        renderer.render_scene(&frame, RenderTarget::Primary)?;
        renderer.composite(RenderTarget::Primary, RenderTarget::Bloom, RenderTarget::Screen)
    }

    fn direct(
        scene: &Scene,
        materials: &MaterialLibrary,
        camera: &PerspectiveCamera,
        renderer: &mut dyn Renderer,
    ) -> Result<(), RenderError> {
        let frame = FrameData { scene, materials, camera };
        renderer.render_scene(&frame, RenderTarget::Screen)
    }

    fn lost(&mut self, err: RenderError) -> FrameOutcome {
        log::error!("frame dropped: {err}");
        self.stats.failures += 1;
        FrameOutcome::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layer::Layers;
    use crate::components::material::{BasicMaterial, Material};
    use crate::components::mesh::Geometry;
    use crate::components::node::Node;

    /// What the mock saw during one call.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Scene { target: RenderTarget, materials: Vec<(NodeId, MaterialId)> },
        Bloom,
        Composite,
        Resize(u32, u32),
    }

    #[derive(Default)]
    struct MockRenderer {
        calls: Vec<Call>,
        fail_on_target: Option<RenderTarget>,
        fail_bloom: bool,
    }

    impl Renderer for MockRenderer {
        fn backend(&self) -> &'static str {
            "mock"
        }

        fn render_scene(&mut self, frame: &FrameData, target: RenderTarget) -> Result<(), RenderError> {
            self.calls.push(Call::Scene { target, materials: frame.scene.material_snapshot() });
            if self.fail_on_target == Some(target) {
                return Err(RenderError::MissingGeometry(NodeId(99)));
            }
            Ok(())
        }

        fn bloom_pass(&mut self, _: &BloomSettings, _: RenderTarget, _: RenderTarget) -> Result<(), RenderError> {
            self.calls.push(Call::Bloom);
            if self.fail_bloom {
                return Err(RenderError::Backend { pass: "bloom", reason: "lost context".into() });
            }
            Ok(())
        }

        fn composite(&mut self, _: RenderTarget, _: RenderTarget, _: RenderTarget) -> Result<(), RenderError> {
            self.calls.push(Call::Composite);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.calls.push(Call::Resize(width, height));
        }
    }

    fn fixture() -> (Scene, MaterialLibrary) {
        let mut materials = MaterialLibrary::new();
        let sun = materials.add(Material::Basic(BasicMaterial::new([1.0, 0.8, 0.2])));
        let rock = materials.add(Material::Basic(BasicMaterial::new([0.5, 0.5, 0.5])));
        let mut scene = Scene::new();
        scene.spawn(
            Node::new(NodeId(1))
                .with_geometry(Geometry::sphere(5.0, 32))
                .with_material(sun)
                .with_layers(Layers::scene_and_bloom()),
        );
        scene.spawn(Node::new(NodeId(2)).with_geometry(Geometry::sphere(1.0, 32)).with_material(rock));
        scene.spawn(Node::new(NodeId(3)));
        (scene, materials)
    }

    #[test]
    fn darken_then_restore_is_identity() {
        let (mut scene, materials) = fixture();
        let before = scene.material_snapshot();
        let mut table = MaterialSwapTable::new();
        assert_eq!(table.darken(&mut scene, materials.hidden()), 1);
        assert_eq!(scene.get(NodeId(2)).unwrap().material, Some(materials.hidden()));
        table.restore(&mut scene);
        assert!(table.is_empty());
        assert_eq!(scene.material_snapshot(), before);
    }

    #[test]
    fn darken_skips_hidden_nodes() {
        let (mut scene, materials) = fixture();
        scene.get_mut(NodeId(2)).unwrap().visible = false;
        let mut table = MaterialSwapTable::new();
        assert_eq!(table.darken(&mut scene, materials.hidden()), 0);
    }

    #[test]
    fn full_cycle_sequences_passes_and_restores_materials() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        let mut renderer = MockRenderer::default();
        let before = scene.material_snapshot();

        let outcome = bloom.render_frame(&mut scene, &materials, &camera, &mut renderer);

        assert_eq!(outcome, FrameOutcome::Composited);
        assert_eq!(scene.material_snapshot(), before);
        assert_eq!(bloom.pending_swaps(), 0);
        assert_eq!(renderer.calls.len(), 4);

        // The bloom source pass saw the rock hidden and the sun intact.
        match &renderer.calls[0] {
            Call::Scene { target, materials: seen } => {
                assert_eq!(*target, RenderTarget::BloomSource);
                assert!(seen.contains(&(NodeId(2), MaterialLibrary::HIDDEN)));
                assert!(seen.contains(&before[0]));
            }
            other => panic!("unexpected first call {:?}", other),
        }
        assert_eq!(renderer.calls[1], Call::Bloom);
        assert_eq!(
            renderer.calls[2],
            Call::Scene { target: RenderTarget::Primary, materials: before.clone() }
        );
        assert_eq!(renderer.calls[3], Call::Composite);
    }

    #[test]
    fn many_frames_never_leak_materials() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        let mut renderer = MockRenderer::default();
        let before = scene.material_snapshot();
        for _ in 0..10 {
            bloom.render_frame(&mut scene, &materials, &camera, &mut renderer);
        }
        assert_eq!(scene.material_snapshot(), before);
        assert_eq!(bloom.stats().composited, 10);
    }

    #[test]
    fn bloom_failure_restores_and_falls_back() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        let mut renderer = MockRenderer { fail_bloom: true, ..Default::default() };
        let before = scene.material_snapshot();

        let outcome = bloom.render_frame(&mut scene, &materials, &camera, &mut renderer);

        assert!(matches!(outcome, FrameOutcome::Fallback(RenderError::Backend { .. })));
        assert_eq!(scene.material_snapshot(), before);
        // Last call is the direct render with original materials.
        assert_eq!(
            renderer.calls.last(),
            Some(&Call::Scene { target: RenderTarget::Screen, materials: before })
        );
        assert!(!renderer.calls.contains(&Call::Composite));
        assert_eq!(bloom.stats().fallbacks, 1);
    }

    #[test]
    fn primary_failure_falls_back() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        let mut renderer = MockRenderer { fail_on_target: Some(RenderTarget::Primary), ..Default::default() };
        let outcome = bloom.render_frame(&mut scene, &materials, &camera, &mut renderer);
        assert_eq!(outcome, FrameOutcome::Fallback(RenderError::MissingGeometry(NodeId(99))));
    }

    #[test]
    fn failed_fallback_is_reported_not_panicked() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        bloom.enabled = false;
        let mut renderer = MockRenderer { fail_on_target: Some(RenderTarget::Screen), ..Default::default() };
        let outcome = bloom.render_frame(&mut scene, &materials, &camera, &mut renderer);
        assert_eq!(outcome.code(), 3);
        assert_eq!(bloom.stats().failures, 1);
    }

    #[test]
    fn disabled_bloom_renders_direct() {
        let (mut scene, materials) = fixture();
        let camera = PerspectiveCamera::default();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        bloom.enabled = false;
        let mut renderer = MockRenderer::default();
        assert_eq!(bloom.render_frame(&mut scene, &materials, &camera, &mut renderer), FrameOutcome::Direct);
        assert_eq!(renderer.calls.len(), 1);
    }

    #[test]
    fn resize_reaches_backend_once_and_keeps_transforms() {
        let (mut scene, _materials) = fixture();
        scene.get_mut(NodeId(2)).unwrap().local.translation = glam::Vec3::new(4.0, 0.0, 1.0);
        let before: Vec<_> = scene.iter().map(|n| (n.local, n.world)).collect();
        let mut bloom = SelectiveBloom::new(BloomSettings::default(), &Viewport::default());
        let mut renderer = MockRenderer::default();

        let viewport = Viewport::new(1024, 512, 2.0);
        bloom.resize(&viewport, &mut renderer);
        bloom.resize(&viewport, &mut renderer);

        assert_eq!(renderer.calls, vec![Call::Resize(2048, 1024)]);
        assert_eq!(bloom.sizes().bloom, (2048, 1024));
        assert_eq!(bloom.sizes().composite, (2048, 1024));
        let after: Vec<_> = scene.iter().map(|n| (n.local, n.world)).collect();
        assert_eq!(before, after);
    }
}
