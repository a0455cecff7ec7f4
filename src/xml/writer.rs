//! Writer für BlockMod XML-Netzwerkdateien.

use crate::core::{Block, Connector, Network, HELPER_BLOCK_NAME};
use anyhow::Result;
use glam::DVec2;

/// Schreibt ein Netzwerk als BlockMod-XML
///
/// Der Hilfsblock einer laufenden Verbindung und alle Connectors, die ihn
/// beruehren, werden nicht geschrieben.
pub fn write_network(network: &Network) -> Result<String> {
    let blocks: Vec<&Block> = network
        .blocks()
        .map(|(_, block)| block)
        .filter(|block| !block.is_connection_helper())
        .collect();
    let connectors: Vec<&Connector> = network
        .connectors()
        .map(|(_, con)| con)
        .filter(|con| !con.touches_block(HELPER_BLOCK_NAME))
        .collect();

    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    output.push_str("<BlockMod>\n");

    if !blocks.is_empty() {
        output.push_str("    <!--Blocks-->\n");
        output.push_str("    <Blocks>\n");
        for block in &blocks {
            write_block(&mut output, block);
        }
        output.push_str("    </Blocks>\n");
    }

    if !connectors.is_empty() {
        output.push_str("    <!--Connectors-->\n");
        output.push_str("    <Connectors>\n");
        for con in &connectors {
            write_connector(&mut output, con);
        }
        output.push_str("    </Connectors>\n");
    }

    output.push_str("</BlockMod>\n");

    log::debug!(
        "Netzwerk geschrieben: {} Blocks, {} Connectors",
        blocks.len(),
        connectors.len()
    );
    Ok(output)
}

fn write_block(output: &mut String, block: &Block) {
    output.push_str(&format!(
        "        <Block name=\"{}\">\n",
        escape_xml(&block.name)
    ));
    output.push_str(&format!(
        "            <Position>{}</Position>\n",
        format_point(block.position)
    ));
    output.push_str(&format!(
        "            <Size>{}</Size>\n",
        format_point(block.size)
    ));

    if !block.sockets.is_empty() {
        output.push_str("            <Sockets>\n");
        for socket in &block.sockets {
            output.push_str(&format!(
                "                <Socket name=\"{}\">\n",
                escape_xml(&socket.name)
            ));
            output.push_str(&format!(
                "                    <Position>{}</Position>\n",
                format_point(socket.position)
            ));
            output.push_str(&format!(
                "                    <Orientation>{}</Orientation>\n",
                socket.orientation.as_str()
            ));
            output.push_str(&format!(
                "                    <Inlet>{}</Inlet>\n",
                socket.inlet
            ));
            output.push_str("                </Socket>\n");
        }
        output.push_str("            </Sockets>\n");
    }

    let properties = &block.properties;
    if properties.show_pixmap.is_some() || !properties.extra.is_empty() {
        output.push_str("            <Properties>\n");
        if let Some(show_pixmap) = properties.show_pixmap {
            output.push_str(&format!(
                "                <ShowPixmap>{}</ShowPixmap>\n",
                show_pixmap
            ));
        }
        // Unbekannte Eigenschaften in Original-Reihenfolge
        for (key, value) in &properties.extra {
            output.push_str(&format!(
                "                <{}>{}</{}>\n",
                key,
                escape_xml(value),
                key
            ));
        }
        output.push_str("            </Properties>\n");
    }

    output.push_str("        </Block>\n");
}

fn write_connector(output: &mut String, con: &Connector) {
    output.push_str(&format!(
        "        <Connector name=\"{}\">\n",
        escape_xml(&con.name)
    ));
    if !con.source.is_empty() {
        output.push_str(&format!(
            "            <Source>{}</Source>\n",
            escape_xml(&con.source)
        ));
    }
    if !con.target.is_empty() {
        output.push_str(&format!(
            "            <Target>{}</Target>\n",
            escape_xml(&con.target)
        ));
    }
    if !con.segments.is_empty() {
        output.push_str("            <Segments>\n");
        for segment in &con.segments {
            output.push_str("                <Segment>\n");
            output.push_str(&format!(
                "                    <Orientation>{}</Orientation>\n",
                segment.direction.as_str()
            ));
            output.push_str(&format!(
                "                    <Offset>{}</Offset>\n",
                format_float(segment.offset)
            ));
            output.push_str("                </Segment>\n");
        }
        output.push_str("            </Segments>\n");
    }
    output.push_str("        </Connector>\n");
}

fn format_point(point: DVec2) -> String {
    format!("{},{}", format_float(point.x), format_float(point.y))
}

/// Kuerzeste Darstellung, die beim Einlesen exakt denselben Wert ergibt.
fn format_float(value: f64) -> String {
    format!("{}", value)
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Orientation, Segment, Socket};

    #[test]
    fn test_format_float_is_shortest_roundtrip() {
        assert_eq!(format_float(100.0), "100");
        assert_eq!(format_float(-8.0), "-8");
        assert_eq!(format_float(0.1), "0.1");
        assert_eq!(format_float(1.0 / 3.0).parse::<f64>().unwrap(), 1.0 / 3.0);
        assert_eq!(format_point(DVec2::new(16.0, 2.5)), "16,2.5");
    }

    #[test]
    fn test_helper_block_is_not_written() {
        let mut network = Network::new();
        let mut a = Block::new("A", DVec2::ZERO, DVec2::new(40.0, 40.0));
        a.sockets.push(Socket::new(
            "out",
            DVec2::new(40.0, 16.0),
            Orientation::Horizontal,
            false,
        ));
        network.push_block(a);
        network.push_block(Block::connection_helper(
            DVec2::new(100.0, 100.0),
            DVec2::new(20.0, 20.0),
        ));
        let mut con = Connector::new("drag", "A.out", format!("{0}.{0}", HELPER_BLOCK_NAME));
        con.segments.push(Segment::horizontal(8.0));
        network.push_connector(con);

        let xml = write_network(&network).expect("Export fehlgeschlagen");
        assert!(xml.contains("<Block name=\"A\">"));
        assert!(!xml.contains("invisible"));
        assert!(!xml.contains("<Connectors>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut network = Network::new();
        network.push_block(Block::new("R&D", DVec2::ZERO, DVec2::new(8.0, 8.0)));
        let xml = write_network(&network).expect("Export fehlgeschlagen");
        assert!(xml.contains("<Block name=\"R&amp;D\">"));
    }
}
