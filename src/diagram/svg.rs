//! SVG serialization of scenes.

use std::collections::HashSet;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::interaction::InteractionState;
use super::scene::{Def, Element, Paint, Scene};
use super::shape::{num, Shape};
use crate::error::{Error, Result};
use crate::types::ElementId;

/// Class added to highlighted elements.
pub const HOVERED_CLASS: &str = "hovered";

/// Serialize a scene with its current pointer state.
pub fn to_svg(scene: &Scene, state: &InteractionState) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
    root.push_attribute(("width", num(scene.width).as_str()));
    root.push_attribute(("height", num(scene.height).as_str()));
    root.push_attribute(("viewBox", format!("0 0 {} {}", num(scene.width), num(scene.height)).as_str()));
    writer.write_event(Event::Start(root))?;

    if !scene.defs.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("defs")))?;
        for def in &scene.defs {
            write_def(&mut writer, def)?;
        }
        writer.write_event(Event::End(BytesEnd::new("defs")))?;
    }

    let mut emitted: HashSet<&ElementId> = HashSet::new();
    for element in &scene.elements {
        match &element.group {
            None => write_element(&mut writer, element, state)?,
            Some(group) if emitted.insert(group) => {
                let mut g = BytesStart::new("g");
                g.push_attribute(("id", group.as_str()));
                if scene.group_hidden(group) {
                    g.push_attribute(("display", "none"));
                }
                writer.write_event(Event::Start(g))?;
                for member in scene.elements.iter().filter(|e| e.group.as_ref() == Some(group)) {
                    write_element(&mut writer, member, state)?;
                }
                writer.write_event(Event::End(BytesEnd::new("g")))?;
            }
            Some(_) => {}
        }
    }

    writer.write_event(Event::End(BytesEnd::new("svg")))?;
    String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))
}

fn write_def(writer: &mut Writer<Vec<u8>>, def: &Def) -> Result<()> {
    match def {
        Def::LinearGradient { id, from, to, stops } => {
            let mut g = BytesStart::new("linearGradient");
            g.push_attribute(("id", id.as_str()));
            g.push_attribute(("x1", percent(from.x).as_str()));
            g.push_attribute(("y1", percent(from.y).as_str()));
            g.push_attribute(("x2", percent(to.x).as_str()));
            g.push_attribute(("y2", percent(to.y).as_str()));
            writer.write_event(Event::Start(g))?;
            for stop in stops {
                let mut s = BytesStart::new("stop");
                s.push_attribute(("offset", percent(stop.offset).as_str()));
                s.push_attribute(("stop-color", stop.color.to_string().as_str()));
                writer.write_event(Event::Empty(s))?;
            }
            writer.write_event(Event::End(BytesEnd::new("linearGradient")))?;
        }
        Def::Pattern { id, width, height, rotate, content } => {
            let mut p = BytesStart::new("pattern");
            p.push_attribute(("id", id.as_str()));
            p.push_attribute(("patternUnits", "userSpaceOnUse"));
            p.push_attribute(("patternTransform", format!("rotate({})", num(*rotate)).as_str()));
            p.push_attribute(("width", num(*width).as_str()));
            p.push_attribute(("height", num(*height).as_str()));
            writer.write_event(Event::Start(p))?;
            let idle = InteractionState::default();
            for element in content {
                write_element(writer, element, &idle)?;
            }
            writer.write_event(Event::End(BytesEnd::new("pattern")))?;
        }
        Def::Marker { id, size, reference, path, fill } => {
            let mut m = BytesStart::new("marker");
            m.push_attribute(("id", id.as_str()));
            m.push_attribute(("markerWidth", num(*size).as_str()));
            m.push_attribute(("markerHeight", num(*size).as_str()));
            m.push_attribute(("refX", num(reference.x).as_str()));
            m.push_attribute(("refY", num(reference.y).as_str()));
            m.push_attribute(("orient", "auto"));
            writer.write_event(Event::Start(m))?;
            let mut p = BytesStart::new("path");
            p.push_attribute(("d", path.to_d().as_str()));
            p.push_attribute(("fill", fill.to_string().as_str()));
            writer.write_event(Event::Empty(p))?;
            writer.write_event(Event::End(BytesEnd::new("marker")))?;
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element, state: &InteractionState) -> Result<()> {
    let highlighted = element.id.as_ref().is_some_and(|id| state.is_highlighted(id));
    let paint = match (&element.hover, highlighted) {
        (Some(style), true) => &style.paint,
        _ => &element.paint,
    };

    let tag = element.shape.tag();
    let mut start = BytesStart::new(tag);
    if let Some(id) = &element.id {
        start.push_attribute(("id", id.as_str()));
    }
    let mut classes = element.classes.clone();
    if highlighted {
        classes.push(HOVERED_CLASS.to_string());
    }
    if !classes.is_empty() {
        start.push_attribute(("class", classes.join(" ").as_str()));
    }

    for (key, value) in geometry(&element.shape) {
        start.push_attribute((key, value.as_str()));
    }
    for (key, value) in paint_attributes(paint) {
        start.push_attribute((key, value.as_str()));
    }
    if element.offset.x != 0.0 || element.offset.y != 0.0 {
        let translate = format!("translate({},{})", num(element.offset.x), num(element.offset.y));
        start.push_attribute(("transform", translate.as_str()));
    }

    match &element.shape {
        Shape::Text(text) => {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(&text.content)))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        _ => writer.write_event(Event::Empty(start))?,
    }
    Ok(())
}

fn geometry(shape: &Shape) -> Vec<(&'static str, String)> {
    match shape {
        Shape::Rect(r) => {
            let mut attrs = vec![
                ("x", num(r.x)),
                ("y", num(r.y)),
                ("width", num(r.width)),
                ("height", num(r.height)),
            ];
            if r.rx > 0.0 {
                attrs.push(("rx", num(r.rx)));
            }
            attrs
        }
        Shape::Circle(c) => vec![("cx", num(c.cx)), ("cy", num(c.cy)), ("r", num(c.r))],
        Shape::Ellipse(e) => vec![("cx", num(e.cx)), ("cy", num(e.cy)), ("rx", num(e.rx)), ("ry", num(e.ry))],
        Shape::Polygon(p) => {
            let points: Vec<String> = p.points.iter().map(|pt| format!("{},{}", num(pt.x), num(pt.y))).collect();
            vec![("points", points.join(" "))]
        }
        Shape::Path(p) => vec![("d", p.to_d())],
        Shape::Text(t) => {
            let mut attrs = vec![
                ("x", num(t.x)),
                ("y", num(t.y)),
                ("text-anchor", t.anchor.as_str().to_string()),
                ("font-size", num(t.font_size)),
            ];
            if t.bold {
                attrs.push(("font-weight", "bold".to_string()));
            }
            if let Some(angle) = t.rotate {
                attrs.push(("transform", format!("rotate({},{},{})", num(angle), num(t.x), num(t.y))));
            }
            attrs
        }
    }
}

fn paint_attributes(paint: &Paint) -> Vec<(&'static str, String)> {
    let mut attrs = vec![("fill", paint.fill.to_string())];
    if paint.stroke != super::scene::Fill::None {
        attrs.push(("stroke", paint.stroke.to_string()));
        attrs.push(("stroke-width", num(paint.stroke_width)));
    }
    if paint.opacity < 1.0 {
        attrs.push(("opacity", num(paint.opacity)));
    }
    if let Some(dash) = &paint.dash {
        let pattern: Vec<String> = dash.iter().map(|d| num(*d)).collect();
        attrs.push(("stroke-dasharray", pattern.join(",")));
    }
    if let Some(marker) = &paint.marker_end {
        attrs.push(("marker-end", format!("url(#{marker})")));
    }
    attrs
}

fn percent(v: f64) -> String {
    format!("{}%", num(v * 100.0))
}
