//! Camera state for the graph canvas: zoom/pan transform, tweened
//! transitions, and settle-delayed fits.
//!
//! Transitions are generation-stamped: each one bumps a counter, and a
//! scheduled fit only applies if its stamp is still current when the
//! delay elapses. Whatever the analyst (or a selection change) did
//! last wins; a stale fit can never clobber a newer camera.

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Delay before fitting to a freshly isolated subgraph, giving the
/// force layout time to settle on the reduced node set.
pub const SETTLE_MS: f64 = 200.0;
/// Fit parameters used when a ring isolation triggers the fit.
pub const ISOLATE_FIT_PADDING_PX: f64 = 50.0;
pub const ISOLATE_FIT_MS: f64 = 800.0;
/// Fit parameters for the toolbar's fit button.
pub const MANUAL_FIT_PADDING_PX: f64 = 20.0;
pub const MANUAL_FIT_MS: f64 = 400.0;
/// Camera applied when a node is picked for inspection.
pub const FOCUS_ZOOM: f64 = 4.0;
pub const FOCUS_MS: f64 = 1000.0;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Axis-aligned bounds of the displayed content, in world coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

#[derive(Clone, Copy, Debug)]
struct CameraTween {
	from: ViewTransform,
	to: ViewTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

#[derive(Clone, Copy, Debug)]
struct PendingFit {
	remaining_ms: f64,
	padding_px: f64,
	animate_ms: f64,
	generation: u64,
}

/// Owns the camera. Animations and settle delays advance through
/// [`Viewport::tick`], so behavior is deterministic under test.
#[derive(Clone, Debug)]
pub struct Viewport {
	transform: ViewTransform,
	width: f64,
	height: f64,
	tween: Option<CameraTween>,
	pending_fit: Option<PendingFit>,
	generation: u64,
}

impl Viewport {
	/// A viewport centered on the world origin, where the simulation
	/// seeds its nodes.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
			tween: None,
			pending_fit: None,
			generation: 0,
		}
	}

	pub fn transform(&self) -> ViewTransform {
		self.transform
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Multiply the zoom by `factor`, keeping the viewport midpoint
	/// fixed.
	pub fn zoom_by(&mut self, factor: f64, animate_ms: f64) {
		let current = self.transform;
		let k = (current.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / current.k;
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		self.animate_to(
			ViewTransform {
				x: cx - (cx - current.x) * ratio,
				y: cy - (cy - current.y) * ratio,
				k,
			},
			animate_ms,
		);
	}

	/// Zoom by `factor` keeping the screen-space `anchor` fixed, for
	/// wheel input.
	pub fn wheel_zoom(&mut self, anchor: (f64, f64), factor: f64) {
		let _ = self.begin();
		let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.transform.k;
		self.transform.x = anchor.0 - (anchor.0 - self.transform.x) * ratio;
		self.transform.y = anchor.1 - (anchor.1 - self.transform.y) * ratio;
		self.transform.k = k;
		self.tween = None;
	}

	/// Place the camera so `content` sits inside the viewport with
	/// `padding_px` of margin.
	pub fn fit_to_content(&mut self, content: Bounds, padding_px: f64, animate_ms: f64) {
		self.animate_to(self.fit_transform(content, padding_px), animate_ms);
	}

	/// Center on a world position at `target_zoom`.
	pub fn focus_on(&mut self, position: (f64, f64), target_zoom: f64, animate_ms: f64) {
		let k = target_zoom.clamp(MIN_ZOOM, MAX_ZOOM);
		self.animate_to(
			ViewTransform {
				x: self.width / 2.0 - position.0 * k,
				y: self.height / 2.0 - position.1 * k,
				k,
			},
			animate_ms,
		);
	}

	/// Ask for a fit after `settle_ms` of simulation time. The fit
	/// fires from [`Viewport::tick`] with the bounds current at that
	/// moment, and only if no newer transition has started meanwhile.
	pub fn schedule_fit(&mut self, settle_ms: f64, padding_px: f64, animate_ms: f64) {
		let generation = self.begin();
		self.pending_fit = Some(PendingFit {
			remaining_ms: settle_ms,
			padding_px,
			animate_ms,
			generation,
		});
	}

	/// Direct pan, for mouse drags.
	pub fn pan_to(&mut self, x: f64, y: f64) {
		let _ = self.begin();
		self.transform.x = x;
		self.transform.y = y;
		self.tween = None;
	}

	/// Advance animations and pending fits by `dt_ms`.
	pub fn tick(&mut self, dt_ms: f64, content: Option<Bounds>) {
		if let Some(pending) = self.pending_fit {
			let remaining = pending.remaining_ms - dt_ms;
			if remaining > 0.0 {
				self.pending_fit = Some(PendingFit {
					remaining_ms: remaining,
					..pending
				});
			} else {
				self.pending_fit = None;
				// A transition that started after the schedule wins.
				if pending.generation == self.generation {
					if let Some(content) = content {
						self.fit_to_content(content, pending.padding_px, pending.animate_ms);
					}
				}
			}
		}

		if let Some(mut tween) = self.tween.take() {
			tween.elapsed_ms += dt_ms;
			if tween.elapsed_ms >= tween.duration_ms {
				self.transform = tween.to;
			} else {
				let t = ease_out_cubic(tween.elapsed_ms / tween.duration_ms);
				self.transform = ViewTransform {
					x: tween.from.x + (tween.to.x - tween.from.x) * t,
					y: tween.from.y + (tween.to.y - tween.from.y) * t,
					k: tween.from.k + (tween.to.k - tween.from.k) * t,
				};
				self.tween = Some(tween);
			}
		}
	}

	fn begin(&mut self) -> u64 {
		self.generation += 1;
		self.generation
	}

	fn animate_to(&mut self, to: ViewTransform, animate_ms: f64) {
		let _ = self.begin();
		if animate_ms <= 0.0 {
			self.transform = to;
			self.tween = None;
		} else {
			self.tween = Some(CameraTween {
				from: self.transform,
				to,
				elapsed_ms: 0.0,
				duration_ms: animate_ms,
			});
		}
	}

	fn fit_transform(&self, content: Bounds, padding_px: f64) -> ViewTransform {
		let (cx, cy) = content.center();
		let usable_w = (self.width - 2.0 * padding_px).max(1.0);
		let usable_h = (self.height - 2.0 * padding_px).max(1.0);
		let k = if content.width() <= f64::EPSILON || content.height() <= f64::EPSILON {
			1.0
		} else {
			(usable_w / content.width())
				.min(usable_h / content.height())
				.clamp(MIN_ZOOM, MAX_ZOOM)
		};
		ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn viewport() -> Viewport {
		Viewport::new(800.0, 600.0)
	}

	fn content() -> Bounds {
		Bounds {
			min_x: 0.0,
			min_y: 0.0,
			max_x: 100.0,
			max_y: 100.0,
		}
	}

	#[test]
	fn instant_zoom_multiplies_and_keeps_midpoint() {
		let mut vp = viewport();
		vp.zoom_by(2.0, 0.0);
		let t = vp.transform();
		assert_eq!(t.k, 2.0);
		// The world point under the viewport midpoint must not move:
		// it was the origin (transform starts centered).
		assert_eq!((t.x, t.y), (400.0, 300.0));
	}

	#[test]
	fn zoom_clamps_to_bounds() {
		let mut vp = viewport();
		vp.zoom_by(1000.0, 0.0);
		assert_eq!(vp.transform().k, MAX_ZOOM);
		vp.zoom_by(1e-6, 0.0);
		assert_eq!(vp.transform().k, MIN_ZOOM);
	}

	#[test]
	fn animated_zoom_converges_on_target() {
		let mut vp = viewport();
		vp.zoom_by(2.0, 100.0);
		assert_eq!(vp.transform().k, 1.0);
		vp.tick(50.0, None);
		let mid = vp.transform().k;
		assert!(mid > 1.0 && mid < 2.0);
		vp.tick(60.0, None);
		assert_eq!(vp.transform().k, 2.0);
	}

	#[test]
	fn fit_places_content_inside_padding() {
		let mut vp = viewport();
		// 800x600 viewport, 100x100 content, 50px padding:
		// k = min(700/100, 500/100) = 5, centered on (50, 50).
		vp.fit_to_content(content(), 50.0, 0.0);
		let t = vp.transform();
		assert_eq!(t.k, 5.0);
		assert_eq!((t.x, t.y), (400.0 - 250.0, 300.0 - 250.0));
	}

	#[test]
	fn fit_on_degenerate_content_resets_zoom() {
		let mut vp = viewport();
		let point = Bounds {
			min_x: 10.0,
			min_y: 10.0,
			max_x: 10.0,
			max_y: 10.0,
		};
		vp.fit_to_content(point, 50.0, 0.0);
		assert_eq!(vp.transform().k, 1.0);
	}

	#[test]
	fn focus_centers_the_position() {
		let mut vp = viewport();
		vp.focus_on((10.0, 20.0), 4.0, 0.0);
		let t = vp.transform();
		assert_eq!(t.k, 4.0);
		assert_eq!((t.x, t.y), (400.0 - 40.0, 300.0 - 80.0));
	}

	#[test]
	fn scheduled_fit_fires_after_the_settle_delay() {
		let mut vp = viewport();
		vp.schedule_fit(200.0, 50.0, 0.0);
		vp.tick(100.0, Some(content()));
		assert_eq!(vp.transform().k, 1.0);
		vp.tick(150.0, Some(content()));
		assert_eq!(vp.transform().k, 5.0);
	}

	#[test]
	fn stale_scheduled_fit_is_discarded_by_a_newer_transition() {
		let mut vp = viewport();
		vp.schedule_fit(200.0, 50.0, 0.0);
		// The analyst picks a node before the layout settles.
		vp.focus_on((10.0, 20.0), 4.0, 0.0);
		let focused = vp.transform();
		vp.tick(300.0, Some(content()));
		assert_eq!(vp.transform(), focused);
	}

	#[test]
	fn rescheduling_replaces_the_pending_fit() {
		let mut vp = viewport();
		vp.schedule_fit(500.0, 50.0, 0.0);
		vp.schedule_fit(100.0, 20.0, 0.0);
		vp.tick(150.0, Some(content()));
		// Only the second fit ran: 20px padding -> k = min(760, 560)/100.
		assert_eq!(vp.transform().k, 5.6);
	}

	#[test]
	fn wheel_zoom_keeps_the_anchor_point_fixed() {
		let mut vp = viewport();
		let before = vp.screen_to_world(200.0, 200.0);
		vp.wheel_zoom((200.0, 200.0), 1.1);
		let after = vp.screen_to_world(200.0, 200.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn manual_input_cancels_a_pending_fit() {
		let mut vp = viewport();
		vp.schedule_fit(200.0, 50.0, 0.0);
		vp.pan_to(123.0, 45.0);
		vp.tick(300.0, Some(content()));
		let t = vp.transform();
		assert_eq!((t.x, t.y), (123.0, 45.0));
		assert_eq!(t.k, 1.0);
	}

	#[test]
	fn data_changes_do_not_touch_the_camera() {
		// Resizing content/bounds between ticks only matters when a fit
		// is pending; the camera itself is independent of the data.
		let mut vp = viewport();
		vp.zoom_by(3.0, 0.0);
		let before = vp.transform();
		vp.tick(1000.0, Some(content()));
		assert_eq!(vp.transform(), before);
	}
}
