use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::model::filter;
use crate::model::graph::GraphModel;
use crate::services::selection::use_selection;

use super::render;
use super::state::ForceGraphState;
use super::viewport::{
	FOCUS_MS, FOCUS_ZOOM, ISOLATE_FIT_MS, ISOLATE_FIT_PADDING_PX, MANUAL_FIT_MS,
	MANUAL_FIT_PADDING_PX, SETTLE_MS,
};

// Pointer travel below this is a click, not a drag.
const CLICK_SLOP_PX: f64 = 3.0;

/// Interactive transaction-graph canvas.
///
/// Displays exactly the subgraph produced by isolating the current
/// selection's ring; applies no filtering of its own beyond that. Node
/// clicks feed the selection controller, and camera reactions to
/// selection changes are driven by observing the published state.
#[component]
pub fn ForceGraphCanvas(#[prop(into)] graph: Signal<GraphModel>) -> impl IntoView {
	let selection = use_selection();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let (show_amounts, set_show_amounts) = signal(false);

	// The one place the displayed subgraph is derived.
	let displayed = Memo::new(move |_| {
		let ring = selection.isolated_ring();
		filter::isolate(&graph.get(), ring.as_deref())
	});
	let is_empty = Memo::new(move |_| displayed.with(GraphModel::is_empty));

	let parent_size = move |canvas: &HtmlCanvasElement| {
		(
			canvas
				.parent_element()
				.map(|p| p.client_width() as f64)
				.unwrap_or(800.0),
			canvas
				.parent_element()
				.map(|p| p.client_height() as f64)
				.unwrap_or(600.0),
		)
	};

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = match web_sys::window() {
			Some(w) => w,
			None => return,
		};

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				log::error!("2d canvas context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() =
			Some(ForceGraphState::new(&displayed.get_untracked(), w, h));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = (
				canvas_resize
					.parent_element()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0),
				canvas_resize
					.parent_element()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0),
			);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Swap the simulation whenever the displayed subgraph changes. The
	// camera deliberately survives the swap.
	let state_data = state.clone();
	Effect::new(move |prev: Option<()>| {
		let subgraph = displayed.get();
		if prev.is_none() {
			return;
		}
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.rebuild(&subgraph);
		}
	});

	// Ring isolation: fit to the reduced node set once the layout has
	// had a moment to settle. The generation stamp inside the viewport
	// drops the fit if anything newer happens first.
	let state_ring = state.clone();
	Effect::new(move |prev: Option<Option<String>>| {
		let ring = selection.isolated_ring();
		if let Some(prev) = prev {
			if prev != ring && ring.is_some() {
				if let Some(ref mut s) = *state_ring.borrow_mut() {
					s.viewport
						.schedule_fit(SETTLE_MS, ISOLATE_FIT_PADDING_PX, ISOLATE_FIT_MS);
				}
			}
		}
		ring
	});

	// Node inspection: center and zoom in on the picked account.
	let state_node = state.clone();
	Effect::new(move |prev: Option<Option<String>>| {
		let node = selection.inspected_node();
		if let Some(ref mut s) = *state_node.borrow_mut() {
			s.inspected = node.clone();
			if prev.is_some() && prev.as_ref() != Some(&node) {
				if let Some(pos) = node.as_deref().and_then(|id| s.node_position(id)) {
					s.viewport.focus_on(pos, FOCUS_ZOOM, FOCUS_MS);
				}
			}
		}
		node
	});

	let state_amounts = state.clone();
	Effect::new(move |_| {
		let on = show_amounts.get();
		if let Some(ref mut s) = *state_amounts.borrow_mut() {
			s.show_amounts = on;
		}
	});

	let cursor_position = move |ev: &MouseEvent| {
		let canvas: Option<HtmlCanvasElement> = canvas_ref.get_untracked().map(Into::into);
		canvas.map(|c| {
			let rect = c.get_bounding_client_rect();
			(
				ev.client_x() as f64 - rect.left(),
				ev.client_y() as f64 - rect.top(),
			)
		})
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = cursor_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.node_idx = Some(idx);
				s.drag.moved = false;
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.start_x = x;
				s.pan.start_y = y;
				let t = s.viewport.transform();
				s.pan.transform_start_x = t.x;
				s.pan.transform_start_y = t.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = cursor_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active && !s.pan.active {
				s.hover = s.node_at_position(x, y);
			}

			if s.drag.active {
				let (dx_px, dy_px) = (x - s.drag.start_x, y - s.drag.start_y);
				if dx_px.abs() > CLICK_SLOP_PX || dy_px.abs() > CLICK_SLOP_PX {
					s.drag.moved = true;
				}
				if s.drag.moved {
					if let Some(idx) = s.drag.node_idx {
						let k = s.viewport.transform().k;
						let (nx, ny) = (
							s.drag.node_start_x + (dx_px / k) as f32,
							s.drag.node_start_y + (dy_px / k) as f32,
						);
						s.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.x = nx;
								node.data.y = ny;
								node.data.is_anchor = true;
							}
						});
					}
				}
			} else if s.pan.active {
				s.viewport.pan_to(
					s.pan.transform_start_x + (x - s.pan.start_x),
					s.pan.transform_start_y + (y - s.pan.start_y),
				);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					if s.drag.moved {
						s.graph.visit_nodes_mut(|node| {
							if node.index() == idx {
								node.data.is_anchor = true;
							}
						});
					} else {
						clicked = s.node_id(idx);
					}
				}
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
		// Forward outside the borrow: the selection change re-enters
		// canvas effects.
		if let Some(id) = clicked {
			selection.select_node(&id);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.hover = None;
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = cursor_position(&ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.viewport.wheel_zoom((x, y), factor);
		}
	};

	let state_zoom_in = state.clone();
	let state_zoom_out = state.clone();
	let state_fit = state.clone();

	view! {
		<div class="graph-surface">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
			/>

			<div class="graph-toolbar">
				<button
					title="Zoom in"
					on:click=move |_| {
						if let Some(ref mut s) = *state_zoom_in.borrow_mut() {
							s.viewport.zoom_by(1.2, MANUAL_FIT_MS);
						}
					}
				>
					"+"
				</button>
				<button
					title="Zoom out"
					on:click=move |_| {
						if let Some(ref mut s) = *state_zoom_out.borrow_mut() {
							s.viewport.zoom_by(0.8, MANUAL_FIT_MS);
						}
					}
				>
					"\u{2212}"
				</button>
				<button
					title="Reset view"
					on:click=move |_| {
						if let Some(ref mut s) = *state_fit.borrow_mut() {
							if let Some(bounds) = s.content_bounds() {
								s.viewport.fit_to_content(
									bounds,
									MANUAL_FIT_PADDING_PX,
									MANUAL_FIT_MS,
								);
							}
						}
					}
				>
					"\u{26F6}"
				</button>
				<button
					title="Toggle edge amounts"
					class:active=move || show_amounts.get()
					on:click=move |_| set_show_amounts.update(|v| *v = !*v)
				>
					"$"
				</button>
			</div>

			<div class="graph-legend">
				<h4>"Threat levels"</h4>
				<div class="legend-row">
					<span class="dot critical"></span>
					"Critical (>50)"
				</div>
				<div class="legend-row">
					<span class="dot flagged"></span>
					"Flagged (1-50)"
				</div>
				<div class="legend-row">
					<span class="dot neutral"></span>
					"Neutral (0)"
				</div>
			</div>

			<Show when=move || selection.isolated_ring().is_some()>
				<div class="isolation-badge">
					"Isolated view: "
					{move || selection.isolated_ring().unwrap_or_default()}
				</div>
			</Show>

			<Show when=move || is_empty.get()>
				<div class="graph-empty">"No graph data"</div>
			</Show>
		</div>
	}
}
