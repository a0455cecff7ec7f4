//! Parser für BlockMod XML-Netzwerkdateien.

mod values;

use crate::core::{Block, Connector, Network, Orientation, Segment, Socket};
use anyhow::{bail, Context, Result};
use glam::DVec2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use values::{parse_bool, parse_float, parse_orientation, parse_point};

/// Parsed ein Netzwerk aus einem XML-String
///
/// Das Ergebnis ist ungeprueft: Namen und Topologie werden erst durch
/// [`Network::check_names`] validiert, Segmente nicht angepasst.
pub fn parse_network(xml_content: &str) -> Result<Network> {
    let mut reader = Reader::from_str(xml_content);
    let mut buffer = Vec::new();
    let mut state = ParseState::default();

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => {
                let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
                let name = name_attribute(&reader, e)?;
                state.open(&tag, name)?;
            }
            Ok(Event::Empty(ref e)) => {
                // <Sockets/> o.ae.: wie Start + End ohne Text
                let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
                let name = name_attribute(&reader, e)?;
                state.open(&tag, name)?;
                state.close(&tag)?;
            }
            Ok(Event::Text(e)) => {
                let text = e.xml_content()?;
                state.text.push_str(&text);
            }
            Ok(Event::CData(e)) => {
                let text = e.decode()?;
                state.text.push_str(&text);
            }
            Ok(Event::GeneralRef(e)) => {
                let entity = e.decode()?;
                state.text.push_str(&resolve_entity(&entity)?);
            }
            Ok(Event::End(ref e)) => {
                let tag = reader.decoder().decode(e.name().as_ref())?.into_owned();
                state.close(&tag)?;
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err).context("Fehler beim Parsen des XML"),
            _ => {}
        }

        buffer.clear();
    }

    state.finish()
}

/// Liest das optionale `name`-Attribut eines Elements.
fn name_attribute(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<Option<String>> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?;
        if key == "name" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Loest `&amp;`, `&lt;`, ... sowie numerische Zeichenreferenzen auf.
fn resolve_entity(entity: &str) -> Result<String> {
    if let Some(value) = quick_xml::escape::resolve_predefined_entity(entity) {
        return Ok(value.to_string());
    }
    if let Some(code) = entity.strip_prefix('#') {
        let number = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        let ch = number
            .and_then(char::from_u32)
            .with_context(|| format!("Ungueltige Zeichenreferenz '&{};'", entity))?;
        return Ok(ch.to_string());
    }
    bail!("Unbekannte Entity '&{};'", entity)
}

/// Zustand des Pull-Parsers: offener Element-Pfad und halbfertige Objekte.
#[derive(Default)]
struct ParseState {
    stack: Vec<String>,
    text: String,
    seen_root: bool,
    block: Option<Block>,
    socket: Option<Socket>,
    connector: Option<Connector>,
    segment: Option<Segment>,
    network: Network,
}

impl ParseState {
    fn open(&mut self, tag: &str, name: Option<String>) -> Result<()> {
        let parent = self.stack.last().cloned();
        match (parent.as_deref(), tag) {
            (None, "BlockMod") if !self.seen_root => self.seen_root = true,
            (None, other) => bail!("Erwartet <BlockMod>, gefunden <{}>", other),
            (Some("BlockMod"), "Blocks" | "Connectors") => {}
            (Some("Blocks"), "Block") => {
                self.block = Some(Block::new(
                    name.unwrap_or_default(),
                    DVec2::ZERO,
                    DVec2::ZERO,
                ));
            }
            (Some("Block"), "Position" | "Size" | "Sockets" | "Properties") => {}
            (Some("Sockets"), "Socket") => {
                self.socket = Some(Socket::new(
                    name.unwrap_or_default(),
                    DVec2::ZERO,
                    Orientation::Horizontal,
                    false,
                ));
            }
            (Some("Socket"), "Position" | "Orientation" | "Inlet") => {}
            // Beliebige Schluessel, nur eine Ebene tief
            (Some("Properties"), _) => {}
            (Some("Connectors"), "Connector") => {
                self.connector = Some(Connector::new(name.unwrap_or_default(), "", ""));
            }
            (Some("Connector"), "Source" | "Target" | "Segments") => {}
            (Some("Segments"), "Segment") => self.segment = Some(Segment::horizontal(0.0)),
            (Some("Segment"), "Orientation" | "Offset") => {}
            (Some(parent), other) => {
                bail!("Unbekanntes Element <{}> in <{}>", other, parent)
            }
        }

        self.stack.push(tag.to_string());
        self.text.clear();
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<()> {
        match self.stack.pop() {
            Some(open) if open == tag => {}
            Some(open) => bail!("Erwartet </{}>, gefunden </{}>", open, tag),
            None => bail!("Unerwartetes </{}>", tag),
        }
        let text = std::mem::take(&mut self.text);
        let parent = self.stack.last().cloned();

        match (parent.as_deref(), tag) {
            (Some("Block"), "Position") => {
                let block = self.current_block()?;
                block.position = parse_point(&text)
                    .with_context(|| format!("Ungueltige Position in Block '{}'", block.name))?;
            }
            (Some("Block"), "Size") => {
                let block = self.current_block()?;
                block.size = parse_point(&text)
                    .with_context(|| format!("Ungueltige Groesse in Block '{}'", block.name))?;
            }
            (Some("Properties"), "ShowPixmap") => {
                let block = self.current_block()?;
                block.properties.show_pixmap = Some(
                    parse_bool(&text)
                        .with_context(|| format!("Ungueltiges ShowPixmap in Block '{}'", block.name))?,
                );
            }
            (Some("Properties"), key) => {
                let block = self.current_block()?;
                block
                    .properties
                    .extra
                    .insert(key.to_string(), text.trim().to_string());
            }
            (Some("Blocks"), "Block") => {
                let block = self.block.take().context("Block-Element ohne Inhalt")?;
                if block.is_connection_helper() {
                    bail!("Reservierter Block-Name '{}'", block.name);
                }
                self.network.push_block(block);
            }
            (Some("Socket"), "Position") => {
                let socket = self.current_socket()?;
                socket.position = parse_point(&text)
                    .with_context(|| format!("Ungueltige Position in Socket '{}'", socket.name))?;
            }
            (Some("Socket"), "Orientation") => {
                let socket = self.current_socket()?;
                socket.orientation = parse_orientation(&text)
                    .with_context(|| format!("Socket '{}'", socket.name))?;
            }
            (Some("Socket"), "Inlet") => {
                let socket = self.current_socket()?;
                socket.inlet = parse_bool(&text)
                    .with_context(|| format!("Ungueltiges Inlet in Socket '{}'", socket.name))?;
            }
            (Some("Sockets"), "Socket") => {
                let socket = self.socket.take().context("Socket-Element ohne Inhalt")?;
                self.current_block()?.sockets.push(socket);
            }
            (Some("Connector"), "Source") => {
                self.current_connector()?.source = text.trim().to_string();
            }
            (Some("Connector"), "Target") => {
                self.current_connector()?.target = text.trim().to_string();
            }
            (Some("Segment"), "Orientation") => {
                let segment = self.current_segment()?;
                segment.direction = parse_orientation(&text).context("Segment")?;
            }
            (Some("Segment"), "Offset") => {
                let segment = self.current_segment()?;
                segment.offset = parse_float(&text).context("Ungueltiger Segment-Offset")?;
            }
            (Some("Segments"), "Segment") => {
                let segment = self.segment.take().context("Segment-Element ohne Inhalt")?;
                self.current_connector()?.segments.push(segment);
            }
            (Some("Connectors"), "Connector") => {
                let connector = self
                    .connector
                    .take()
                    .context("Connector-Element ohne Inhalt")?;
                self.network.push_connector(connector);
            }
            _ => {}
        }
        Ok(())
    }

    fn current_block(&mut self) -> Result<&mut Block> {
        self.block.as_mut().context("Kein offenes <Block>")
    }

    fn current_socket(&mut self) -> Result<&mut Socket> {
        self.socket.as_mut().context("Kein offenes <Socket>")
    }

    fn current_connector(&mut self) -> Result<&mut Connector> {
        self.connector.as_mut().context("Kein offenes <Connector>")
    }

    fn current_segment(&mut self) -> Result<&mut Segment> {
        self.segment.as_mut().context("Kein offenes <Segment>")
    }

    fn finish(self) -> Result<Network> {
        if !self.seen_root {
            bail!("Kein <BlockMod>-Element gefunden");
        }
        if let Some(open) = self.stack.last() {
            bail!("Element <{}> nicht geschlossen", open);
        }
        log::debug!(
            "Netzwerk gelesen: {} Blocks, {} Connectors",
            self.network.block_count(),
            self.network.connector_count()
        );
        Ok(self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Segment;

    const SIMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<BlockMod>
    <!--Blocks-->
    <Blocks>
        <Block name="A">
            <Position>0,0</Position>
            <Size>100,48</Size>
            <Sockets>
                <Socket name="out">
                    <Position>100,24</Position>
                    <Orientation>Horizontal</Orientation>
                    <Inlet>false</Inlet>
                </Socket>
            </Sockets>
            <Properties>
                <ShowPixmap>true</ShowPixmap>
                <Color>red</Color>
            </Properties>
        </Block>
        <Block name="B">
            <Position>300,0</Position>
            <Size>100,48</Size>
            <Sockets>
                <Socket name="in">
                    <Position>0,24</Position>
                    <Orientation>Horizontal</Orientation>
                    <Inlet>true</Inlet>
                </Socket>
            </Sockets>
        </Block>
    </Blocks>
    <Connectors>
        <Connector name="c">
            <Source>A.out</Source>
            <Target>B.in</Target>
            <Segments>
                <Segment>
                    <Orientation>Horizontal</Orientation>
                    <Offset>168</Offset>
                </Segment>
            </Segments>
        </Connector>
    </Connectors>
</BlockMod>
"#;

    #[test]
    fn test_parse_simple_network() {
        let network = parse_network(SIMPLE).expect("Parsing fehlgeschlagen");
        assert_eq!(network.block_count(), 2);
        assert_eq!(network.connector_count(), 1);

        let (_, a) = network.blocks().next().expect("Block A erwartet");
        assert_eq!(a.name, "A");
        assert_eq!(a.size, DVec2::new(100.0, 48.0));
        assert_eq!(a.sockets[0].position, DVec2::new(100.0, 24.0));
        assert!(!a.sockets[0].inlet);
        assert_eq!(a.properties.show_pixmap, Some(true));
        assert_eq!(a.properties.extra.get("Color").map(String::as_str), Some("red"));

        let (_, con) = network.connectors().next().expect("Connector erwartet");
        assert_eq!(con.source, "A.out");
        assert_eq!(con.target, "B.in");
        assert_eq!(con.segments, vec![Segment::horizontal(168.0)]);
        assert!(network.check_names().is_ok());
    }

    #[test]
    fn test_unknown_element_in_socket_is_an_error() {
        let xml = r#"<BlockMod><Blocks><Block name="A"><Sockets>
            <Socket name="s"><Colour>red</Colour></Socket>
        </Sockets></Block></Blocks></BlockMod>"#;

        let err = parse_network(xml).expect_err("Parser sollte fehlschlagen");
        let msg = format!("{err:#}");
        assert!(msg.contains("Unbekanntes Element <Colour> in <Socket>"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let bad_inlet = r#"<BlockMod><Blocks><Block name="A"><Sockets>
            <Socket name="s"><Inlet>yes</Inlet></Socket>
        </Sockets></Block></Blocks></BlockMod>"#;
        assert!(parse_network(bad_inlet).is_err());

        let bad_offset = r#"<BlockMod><Connectors><Connector name="c"><Segments>
            <Segment><Orientation>Vertical</Orientation><Offset>abc</Offset></Segment>
        </Segments></Connector></Connectors></BlockMod>"#;
        assert!(parse_network(bad_offset).is_err());

        let bad_orientation = r#"<BlockMod><Connectors><Connector name="c"><Segments>
            <Segment><Orientation>Diagonal</Orientation></Segment>
        </Segments></Connector></Connectors></BlockMod>"#;
        assert!(parse_network(bad_orientation).is_err());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        let err = parse_network("<Network/>").expect_err("falsche Wurzel");
        assert!(format!("{err:#}").contains("BlockMod"));
        assert!(parse_network("").is_err());
    }

    #[test]
    fn test_empty_sections_and_entities() {
        let xml = r#"<BlockMod><Blocks><Block name="R&amp;D"><Sockets/></Block></Blocks>
            <Connectors><Connector name="c"><Source>R&amp;D.out</Source></Connector></Connectors>
        </BlockMod>"#;

        let network = parse_network(xml).expect("Parsing fehlgeschlagen");
        let (_, block) = network.blocks().next().expect("Block erwartet");
        assert_eq!(block.name, "R&D");
        assert!(block.sockets.is_empty());
        let (_, con) = network.connectors().next().expect("Connector erwartet");
        assert_eq!(con.source, "R&D.out");
        assert_eq!(con.target, "");
    }

    #[test]
    fn test_cdata_text_is_read() {
        let xml = r#"<BlockMod><Connectors><Connector name="c">
            <Source><![CDATA[A.out]]></Source>
            <Target><![CDATA[R&D]]>.in</Target>
        </Connector></Connectors></BlockMod>"#;

        let network = parse_network(xml).expect("Parsing fehlgeschlagen");
        let (_, con) = network.connectors().next().expect("Connector erwartet");
        assert_eq!(con.source, "A.out");
        assert_eq!(con.target, "R&D.in");
    }

    #[test]
    fn test_reserved_helper_name_is_rejected() {
        let xml = format!(
            r#"<BlockMod><Blocks><Block name="{}"><Size>20,20</Size></Block></Blocks></BlockMod>"#,
            crate::core::HELPER_BLOCK_NAME
        );
        let err = parse_network(&xml).expect_err("reservierter Name");
        assert!(format!("{err:#}").contains("Reservierter Block-Name"));
    }
}
