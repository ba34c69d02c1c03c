//! MTL companion library parser
use std::io::{self, BufRead};

use crate::error::{Error, Result};
use crate::geometry::Tuple3;
use crate::material::{Material, MaterialLibrary};
use crate::parse::{for_each_line, parse_components, parse_float};
use crate::resource::ResourceProvider;

/// Parse an MTL stream into a library.
///
/// Content problems never fail the parse: a directive whose numbers don't
/// parse is skipped for that field only. Only a read error is returned.
pub fn parse_materials<R: BufRead>(reader: R) -> Result<MaterialLibrary> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<Material> = None;

    for_each_line(reader, |source| {
        let (number, line) = (source.number, source.text);
        if line.starts_with('#') {
            return Ok(());
        }
        if source.lossy {
            tracing::warn!("MTL line {}: not valid UTF-8, decoded as `{}`", number, line);
        }

        let (keyword, rest) = match line.find(|c: char| c.is_whitespace()) {
            Some(at) => (&line[..at], line[at..].trim_start()),
            None => (line, ""),
        };

        if keyword == "newmtl" {
            if let Some(done) = current.take() {
                library.insert(done);
            }
            tracing::debug!("New material found: {}", rest);
            current = Some(Material::new(rest));
            return Ok(());
        }

        let Some(material) = current.as_mut() else {
            tracing::warn!(
                "MTL line {}: `{}` appears before any newmtl, ignoring",
                number,
                keyword
            );
            return Ok(());
        };

        match keyword {
            "Ka" => material.ambient = read_color(number, rest).or(material.ambient),
            "Kd" => material.diffuse = read_color(number, rest).or(material.diffuse),
            "Ks" => material.specular = read_color(number, rest).or(material.specular),
            "Ns" => {
                if let Some(ns) = read_scalar(number, keyword, rest) {
                    material.shininess = Some(ns);
                }
            }
            "d" => {
                if let Some(d) = read_scalar(number, keyword, rest) {
                    material.opacity = d;
                }
            }
            "Tr" => {
                if let Some(tr) = read_scalar(number, keyword, rest) {
                    material.opacity = 1.0 - tr;
                }
            }
            "map_Kd" => {
                if rest.is_empty() {
                    tracing::warn!("MTL line {}: map_Kd without a filename", number);
                } else {
                    tracing::debug!("New texture found: {}", rest);
                    material.texture = Some(rest.to_string());
                }
            }
            "illum" => {}
            _ => tracing::debug!("Ignoring MTL line {}: {}", number, line),
        }

        Ok(())
    })?;

    if let Some(done) = current {
        library.insert(done);
    }

    Ok(library)
}

fn read_color(number: usize, rest: &str) -> Option<Tuple3> {
    match parse_components(rest, 3) {
        ([r, g, b], None) => Some(Tuple3::new(r, g, b)),
        (_, Some(issue)) => {
            tracing::warn!("MTL line {}: {}, color skipped", number, issue);
            None
        }
    }
}

fn read_scalar(number: usize, keyword: &str, rest: &str) -> Option<f32> {
    let Some(token) = rest.split_whitespace().next() else {
        tracing::warn!("MTL line {}: {} without a value", number, keyword);
        return None;
    };

    parse_float(token)
        .map_err(|issue| tracing::warn!("MTL line {}: {}, {} skipped", number, issue, keyword))
        .ok()
}

/// Open `name` through `resources` and parse it.
///
/// A missing library is not an error: the model still decodes, just without
/// materials. Any other failure to open or read is.
pub fn load_material_library(
    resources: &dyn ResourceProvider,
    name: &str,
) -> Result<MaterialLibrary> {
    tracing::debug!("Loading material library {}", name);
    match resources.open(name) {
        Ok(reader) => parse_materials(reader),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Material library {} not found: {}", name, err);
            Ok(MaterialLibrary::new())
        }
        Err(source) => Err(Error::Resource {
            name: name.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::AssetBundle;
    use std::io::Cursor;

    const WOOD_AND_GLASS: &str = "\
# two materials
newmtl wood
Ka 0.1 0.1 0.1
Kd 0.6 0.4 0.2
Ks 0.0 0.0 0.0
Ns 12.5
illum 2
map_Kd wood.png

newmtl glass
Kd 0.9 0.9 1.0
Tr 0.75
";

    #[test]
    fn test_parse_two_materials() {
        let library = parse_materials(Cursor::new(WOOD_AND_GLASS)).unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["wood", "glass"]);

        let wood = library.get("wood").unwrap();
        assert_eq!(wood.ambient, Some(Tuple3::new(0.1, 0.1, 0.1)));
        assert_eq!(wood.diffuse, Some(Tuple3::new(0.6, 0.4, 0.2)));
        assert_eq!(wood.specular, Some(Tuple3::new(0.0, 0.0, 0.0)));
        assert_eq!(wood.shininess, Some(12.5));
        assert_eq!(wood.opacity, 1.0);
        assert_eq!(wood.texture.as_deref(), Some("wood.png"));

        let glass = library.get("glass").unwrap();
        assert!((glass.opacity - 0.25).abs() < 1e-6);
        assert!(glass.texture.is_none());
    }

    #[test]
    fn test_bad_field_skipped_material_kept() {
        let input = "newmtl rough\nKd 0.5 oops 0.5\nNs x\nd 0.5\n";
        let library = parse_materials(Cursor::new(input)).unwrap();

        let rough = library.get("rough").unwrap();
        assert!(rough.diffuse.is_none());
        assert!(rough.shininess.is_none());
        assert_eq!(rough.opacity, 0.5);
    }

    #[test]
    fn test_directives_before_newmtl_ignored() {
        let input = "Kd 1 1 1\nnewmtl only\n";
        let library = parse_materials(Cursor::new(input)).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.get("only").unwrap().diffuse.is_none());
    }

    #[test]
    fn test_same_name_replaces_lookup() {
        let input = "newmtl dup\nNs 1\nnewmtl dup\nNs 2\n";
        let library = parse_materials(Cursor::new(input)).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("dup").unwrap().shininess, Some(2.0));
    }

    #[test]
    fn test_latin1_names_decoded_lossily() {
        let input: &[u8] = b"# \xa9 studio\nnewmtl caf\xe9\nKd 1 0 0\nnewmtl plain\nNs 3\n";
        let library = parse_materials(Cursor::new(input)).unwrap();

        assert_eq!(library.len(), 2);
        let cafe = library.get("caf\u{fffd}").unwrap();
        assert_eq!(cafe.diffuse, Some(Tuple3::new(1.0, 0.0, 0.0)));
        assert_eq!(library.get("plain").unwrap().shininess, Some(3.0));
    }

    struct LockedResources;

    impl ResourceProvider for LockedResources {
        fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} is locked", name),
            ))
        }
    }

    #[test]
    fn test_unreadable_library_is_resource_error() {
        let result = load_material_library(&LockedResources, "scene.mtl");
        assert!(matches!(
            result,
            Err(Error::Resource { ref name, ref source })
                if name == "scene.mtl" && source.kind() == io::ErrorKind::PermissionDenied
        ));
    }

    #[test]
    fn test_missing_library_is_empty() {
        let bundle = AssetBundle::new("assets");
        let library = load_material_library(&bundle, "missing.mtl").unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn test_library_from_bundle() {
        let bundle = AssetBundle::new("assets").with_asset("assets/scene.mtl", WOOD_AND_GLASS);
        let library = load_material_library(&bundle, "scene.mtl").unwrap();
        assert_eq!(library.len(), 2);
    }
}
