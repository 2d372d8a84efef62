//! The [`Transcode`] trait and its implementations for every supported
//! scalar domain type.
//!
//! | Domain type | Stored as |
//! |---|---|
//! | `Vec<u8>` (binary payload) | [`Scalar::Asset`], contents staged to a file |
//! | [`FileUrl`] | [`Scalar::Asset`] pointing at the file itself |
//! | [`GeoCoordinate`] | [`Scalar::Text`] `"<lat>;<long>"` |
//! | `String`, integers, `f64`, `bool`, `DateTime<Utc>` | passed through |

use chrono::{DateTime, Utc};
use nestrec_types::Scalar;

use crate::asset::{AssetStager, FileUrl};
use crate::error::{TranscodeError, TranscodeResult};
use crate::geo::GeoCoordinate;

/// A domain scalar with a reversible mapping to a store-native [`Scalar`].
pub trait Transcode: Sized {
    /// Human-readable name of the expected stored shape.
    const EXPECTED: &'static str;

    /// Convert to the stored form. May stage blob contents through `assets`.
    fn to_scalar(&self, assets: &AssetStager) -> TranscodeResult<Scalar>;

    /// Convert back from the stored form.
    fn from_scalar(value: &Scalar) -> TranscodeResult<Self>;
}

fn mismatch<T: Transcode>(found: &Scalar) -> TranscodeError {
    TranscodeError::mismatch(T::EXPECTED, found.kind())
}

impl Transcode for String {
    const EXPECTED: &'static str = "text";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Text(self.clone()))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Text(s) => Ok(s.clone()),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for i64 {
    const EXPECTED: &'static str = "int";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Int(*self))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Int(i) => Ok(*i),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

macro_rules! narrow_int {
    ($($ty:ty),*) => {$(
        impl Transcode for $ty {
            const EXPECTED: &'static str = concat!("int (", stringify!($ty), ")");

            fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
                Ok(Scalar::Int(i64::from(*self)))
            }

            fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
                match value {
                    Scalar::Int(i) => <$ty>::try_from(*i)
                        .map_err(|_| TranscodeError::mismatch(Self::EXPECTED, i.to_string())),
                    other => Err(mismatch::<Self>(other)),
                }
            }
        }
    )*};
}

narrow_int!(i32, u32, i16, u16, u8);

impl Transcode for f64 {
    const EXPECTED: &'static str = "double";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Double(*self))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Double(d) => Ok(*d),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for bool {
    const EXPECTED: &'static str = "bool";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Bool(*self))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Bool(b) => Ok(*b),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for DateTime<Utc> {
    const EXPECTED: &'static str = "timestamp";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Timestamp(*self))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Timestamp(t) => Ok(*t),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for GeoCoordinate {
    const EXPECTED: &'static str = "geo-coordinate text";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Text(self.to_store_string()))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Text(s) => GeoCoordinate::parse(s),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for Vec<u8> {
    const EXPECTED: &'static str = "asset";

    fn to_scalar(&self, assets: &AssetStager) -> TranscodeResult<Scalar> {
        assets.stage(self).map(Scalar::Asset)
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Asset(handle) => AssetStager::read(handle),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

impl Transcode for FileUrl {
    const EXPECTED: &'static str = "asset";

    fn to_scalar(&self, _: &AssetStager) -> TranscodeResult<Scalar> {
        Ok(Scalar::Asset(nestrec_types::AssetHandle::new(self.path())))
    }

    fn from_scalar(value: &Scalar) -> TranscodeResult<Self> {
        match value {
            Scalar::Asset(handle) => Ok(FileUrl::new(handle.path())),
            other => Err(mismatch::<Self>(other)),
        }
    }
}

/// Convert a slice of domain values, stopping at the first failure.
pub fn to_scalars<T: Transcode>(values: &[T], assets: &AssetStager) -> TranscodeResult<Vec<Scalar>> {
    values.iter().map(|v| v.to_scalar(assets)).collect()
}

/// Convert a slice of stored values back, stopping at the first failure.
pub fn from_scalars<T: Transcode>(values: &[Scalar]) -> TranscodeResult<Vec<T>> {
    values.iter().map(T::from_scalar).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stager() -> (tempfile::TempDir, AssetStager) {
        let dir = tempfile::tempdir().unwrap();
        let stager = AssetStager::new(dir.path());
        (dir, stager)
    }

    #[test]
    fn native_scalars_pass_through() {
        let (_dir, assets) = stager();
        assert_eq!(
            "hi".to_string().to_scalar(&assets).unwrap(),
            Scalar::Text("hi".into())
        );
        assert_eq!(42i64.to_scalar(&assets).unwrap(), Scalar::Int(42));
        assert_eq!(1.5f64.to_scalar(&assets).unwrap(), Scalar::Double(1.5));
        assert_eq!(true.to_scalar(&assets).unwrap(), Scalar::Bool(true));

        let t = Utc.with_ymd_and_hms(2018, 11, 18, 12, 0, 0).unwrap();
        assert_eq!(t.to_scalar(&assets).unwrap(), Scalar::Timestamp(t));
        assert_eq!(DateTime::<Utc>::from_scalar(&Scalar::Timestamp(t)).unwrap(), t);
    }

    #[test]
    fn narrow_ints_check_range() {
        assert_eq!(u8::from_scalar(&Scalar::Int(200)).unwrap(), 200u8);
        assert!(matches!(
            u8::from_scalar(&Scalar::Int(300)),
            Err(TranscodeError::TypeMismatch { .. })
        ));
        assert!(u32::from_scalar(&Scalar::Int(-1)).is_err());
        assert_eq!(i32::from_scalar(&Scalar::Int(-7)).unwrap(), -7);
    }

    #[test]
    fn wrong_variant_is_type_mismatch() {
        let err = String::from_scalar(&Scalar::Int(1)).unwrap_err();
        match err {
            TranscodeError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "text");
                assert_eq!(found, "int");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(f64::from_scalar(&Scalar::Int(1)).is_err());
    }

    #[test]
    fn coordinate_is_stored_as_text() {
        let (_dir, assets) = stager();
        let c = GeoCoordinate::new(37.331274, -122.030397);
        let stored = c.to_scalar(&assets).unwrap();
        assert_eq!(stored, Scalar::Text("37.331274;-122.030397".into()));
        assert_eq!(GeoCoordinate::from_scalar(&stored).unwrap(), c);
    }

    #[test]
    fn malformed_coordinate_is_type_mismatch() {
        let err = GeoCoordinate::from_scalar(&Scalar::Text("37.3".into())).unwrap_err();
        assert!(matches!(err, TranscodeError::TypeMismatch { .. }));
    }

    #[test]
    fn payload_roundtrips_through_asset() {
        let (_dir, assets) = stager();
        let data = vec![0u8, 1, 2, 255];
        let stored = data.to_scalar(&assets).unwrap();
        assert!(matches!(stored, Scalar::Asset(_)));
        assert_eq!(Vec::<u8>::from_scalar(&stored).unwrap(), data);
    }

    #[test]
    fn payload_list_gets_one_handle_each() {
        let (_dir, assets) = stager();
        let payloads = vec![b"a".to_vec(), b"b".to_vec()];
        let stored = to_scalars(&payloads, &assets).unwrap();
        assert_eq!(stored.len(), 2);
        assert_ne!(stored[0], stored[1]);
        assert_eq!(from_scalars::<Vec<u8>>(&stored).unwrap(), payloads);
    }

    #[test]
    fn file_url_points_at_original_file() {
        let (dir, assets) = stager();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"png").unwrap();
        let url = FileUrl::new(&path);
        let stored = url.to_scalar(&assets).unwrap();
        assert_eq!(stored, Scalar::Asset(nestrec_types::AssetHandle::new(&path)));
        assert_eq!(FileUrl::from_scalar(&stored).unwrap(), url);
        // Nothing staged for file references.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn scalar_list_stops_at_first_mismatch() {
        let stored = vec![Scalar::Int(1), Scalar::Text("x".into()), Scalar::Int(3)];
        assert!(from_scalars::<i64>(&stored).is_err());
    }
}
