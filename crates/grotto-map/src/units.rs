macro_rules! def_units {
    ($t: ident, $doc: literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub struct $t<T>(pub T);
    };
}

def_units!(WorldUnits, "Denotes that the inner `T` is given in world units (one sample grid step).");
def_units!(ChunkUnits, "Denotes that the inner `T` is given in units of whole chunks.");
