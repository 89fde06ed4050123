use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeInfo, MotifCanvasState, NODE_RADIUS};
use crate::studio::projection::EdgeStroke;

const BACKGROUND: &str = "#fbfbfd";
const NODE_BORDER: &str = "#05668D";
const NODE_HOVER_FILL: &str = "#00A896";
/// Perpendicular offset of the control point for paired (A→B, B→A) edges.
const PAIR_BEND: f64 = 28.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &MotifCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn edge_rgb(stroke: EdgeStroke) -> &'static str {
	match stroke {
		EdgeStroke::Solid => "40, 40, 40",
		EdgeStroke::Dashed => "214, 39, 40",
	}
}

fn draw_edges(state: &MotifCanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (3.0 / k.max(0.5), 10.0, 6.0, 12.0);
	let dash_offset = -(state.flow_time * 20.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let positions = state.node_positions();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&edge.source), positions.get(&edge.target)) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		// Non-incident edges fade while a node is hovered.
		let incident = state.hover.node.is_some_and(|h| h == edge.source || h == edge.target);
		let alpha = if incident { 0.9 } else { 0.9 - 0.6 * t };
		let rgb = edge_rgb(edge.stroke);

		ctx.set_stroke_style_str(&format!("rgba({rgb}, {alpha})"));
		ctx.set_line_width(line_width);
		match edge.stroke {
			EdgeStroke::Solid => {
				let _ = ctx.set_line_dash(&js_sys::Array::new());
			}
			EdgeStroke::Dashed => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(gap)));
				ctx.set_line_dash_offset(dash_offset);
			}
		}

		let (ux, uy) = (dx / dist, dy / dist);
		let (cx, cy) = control_point(edge, (x1, y1), (x2, y2), (ux, uy));
		// Direction into the target, along the curve's last tangent.
		let (tx, ty) = (x2 - cx, y2 - cy);
		let tangent = (tx * tx + ty * ty).sqrt().max(0.001);
		let (vx, vy) = (tx / tangent, ty / tangent);
		let (tip_x, tip_y) = (x2 - vx * NODE_RADIUS, y2 - vy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - vx * arrow_size, tip_y - vy * arrow_size);

		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.quadratic_curve_to(cx, cy, back_x, back_y);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&format!("rgba({rgb}, {alpha})"));
		let (px, py) = (-vy * arrow_size * 0.5, vx * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn control_point(edge: &EdgeInfo, (x1, y1): (f64, f64), (x2, y2): (f64, f64), (ux, uy): (f64, f64)) -> (f64, f64) {
	let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
	if edge.paired {
		(mx - uy * PAIR_BEND, my + ux * PAIR_BEND)
	} else {
		(mx, my)
	}
}

fn draw_nodes(state: &MotifCanvasState, ctx: &CanvasRenderingContext2d) {
	let (t, k) = (ease_out_cubic(state.hover.highlight_t), state.transform.k);
	let has_highlight = state.hover.node.is_some();

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let (x, y) = (node.x() as f64, node.y() as f64);
		let highlighted = has_highlight && state.is_highlighted(idx);
		let alpha = if !has_highlight || highlighted { 1.0 } else { 1.0 - 0.5 * t };
		let radius = if state.hover.node == Some(idx) {
			NODE_RADIUS * (1.0 + 0.2 * t)
		} else {
			NODE_RADIUS
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		if state.hover.node == Some(idx) {
			ctx.set_fill_style_str(NODE_HOVER_FILL);
		} else {
			ctx.set_fill_style_str(&node.data.user_data.color);
		}
		ctx.fill();
		ctx.set_stroke_style_str(NODE_BORDER);
		ctx.set_line_width(2.0 / k.max(0.5));
		ctx.stroke();

		ctx.set_fill_style_str("#333");
		ctx.set_font(&format!("{}px Arial", 13.0 / k.max(0.5)));
		ctx.set_text_align("center");
		let _ = ctx.fill_text(&node.data.user_data.label, x, y - radius - 6.0);
		ctx.set_global_alpha(1.0);
	});
}
