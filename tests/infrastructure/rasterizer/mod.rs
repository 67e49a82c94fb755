mod pdfium_rasterizer_test;
