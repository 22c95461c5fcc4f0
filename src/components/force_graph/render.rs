use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ForceGraphState;

const BACKGROUND: &str = "#020205";
const EDGE_COLOR: &str = "rgba(6, 182, 212, 0.25)";
const ARROW_COLOR: &str = "rgba(6, 182, 212, 0.5)";
const AMOUNT_COLOR: &str = "#4ade80";

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let t = state.viewport.transform();
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.transform().k;
	let (line_width, arrow_size) = (1.5 / k, 6.0 / k);

	state.graph.visit_edges(|n1, n2, edge| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (n1.data.user_data.radius, n2.data.user_data.radius);

		ctx.set_stroke_style_str(EDGE_COLOR);
		ctx.set_line_width(line_width);
		ctx.begin_path();
		ctx.move_to(x1 + ux * r1, y1 + uy * r1);
		ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
		ctx.stroke();

		// Direction arrow at the receiving account.
		ctx.set_fill_style_str(ARROW_COLOR);
		let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if state.show_amounts {
			draw_amount_label(ctx, k, (x1 + x2) / 2.0, (y1 + y2) / 2.0, edge.user_data.amount);
		}
	});
}

// Amount overlay at the edge midpoint. Font size is divided by the
// zoom factor so legibility is zoom-invariant.
fn draw_amount_label(ctx: &CanvasRenderingContext2d, k: f64, x: f64, y: f64, amount: f64) {
	let label = format!("${amount:.0}");
	let font_size = 10.0 / k;
	ctx.set_font(&format!("{font_size}px sans-serif"));
	let text_width = ctx
		.measure_text(&label)
		.map(|m| m.width())
		.unwrap_or(font_size * label.len() as f64 * 0.6);
	let pad = font_size * 0.2;
	let (bw, bh) = (text_width + pad * 2.0, font_size + pad * 2.0);

	ctx.set_fill_style_str("rgba(0, 0, 0, 0.8)");
	ctx.fill_rect(x - bw / 2.0, y - bh / 2.0, bw, bh);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(AMOUNT_COLOR);
	let _ = ctx.fill_text(&label, x, y);
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.viewport.transform().k;

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);

		ctx.begin_path();
		let _ = ctx.arc(x, y, info.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(info.color);
		ctx.fill();

		if state.inspected.as_deref() == Some(info.id.as_str()) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, info.radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if state.hover == Some(node.index()) {
			let label = if info.score > 0 {
				format!("{} | Score: {}", info.id, info.score)
			} else {
				info.id.clone()
			};
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
			let _ = ctx.fill_text(&label, x + info.radius + 3.0, y + 3.0);
		}
	});
}
